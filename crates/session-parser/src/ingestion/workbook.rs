//! Workbook reading: spreadsheet bytes to addressable sheets

use calamine::{Data, Reader};

use crate::error::{Error, Result};

/// A single cell value
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    /// Plain numbers and date serials
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Whether the cell holds nothing (or only whitespace)
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text form of the cell; integral numbers print without a fraction
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Trimmed text, `None` when empty
    pub fn as_opt_text(&self) -> Option<String> {
        let text = self.as_text();
        (!text.is_empty()).then_some(text)
    }
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Float(f) => Self::Number(*f),
            Data::Int(i) => Self::Number(*i as f64),
            Data::Bool(b) => Self::Bool(*b),
            Data::DateTime(dt) => Self::Number(dt.as_f64()),
            // ISO date-times keep only their date part
            Data::DateTimeIso(s) => Self::Text(s.split('T').next().unwrap_or(s).to_string()),
            Data::DurationIso(s) => Self::Text(s.clone()),
            _ => Self::Empty,
        }
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A worksheet addressed by absolute 0-based `(row, col)` positions
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Sheet name as shown on its tab
    pub name: String,
    /// Absolute position of `rows[0][0]`
    origin: (u32, u32),
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Build a sheet whose first row/column is A1
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self::from_rows_at(name, (0, 0), rows)
    }

    /// Build a sheet whose first row/column sits at `origin`
    pub fn from_rows_at(
        name: impl Into<String>,
        origin: (u32, u32),
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        Self {
            name: name.into(),
            origin,
            rows,
        }
    }

    fn from_range(name: String, range: &calamine::Range<Data>) -> Self {
        let origin = range.start().unwrap_or((0, 0));
        let rows = range
            .rows()
            .map(|row| row.iter().map(CellValue::from).collect())
            .collect();

        Self { name, origin, rows }
    }

    /// Cell at an absolute position; out-of-range cells are empty
    pub fn cell(&self, row: u32, col: u32) -> &CellValue {
        let (origin_row, origin_col) = self.origin;
        if row < origin_row || col < origin_col {
            return &EMPTY_CELL;
        }

        self.rows
            .get((row - origin_row) as usize)
            .and_then(|r| r.get((col - origin_col) as usize))
            .unwrap_or(&EMPTY_CELL)
    }

    /// First used row
    pub fn first_row(&self) -> u32 {
        self.origin.0
    }

    /// Number of rows from row 0 through the last used row
    pub fn row_count(&self) -> u32 {
        if self.rows.is_empty() {
            0
        } else {
            self.origin.0 + self.rows.len() as u32
        }
    }

    /// Number of columns from column 0 through the last used column
    pub fn column_count(&self) -> u32 {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        if width == 0 {
            0
        } else {
            self.origin.1 + width
        }
    }
}

/// Read every worksheet of a workbook held in memory (xlsx, xlsm, xlsb, xls, ods)
pub fn read_workbook(data: &[u8]) -> Result<Vec<Sheet>> {
    let cursor = std::io::Cursor::new(data);
    let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
        .map_err(|e| Error::Workbook(e.to_string()))?;

    let mut sheets = Vec::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| Error::sheet_parse(&sheet_name, e.to_string()))?;
        sheets.push(Sheet::from_range(sheet_name, &range));
    }

    Ok(sheets)
}
