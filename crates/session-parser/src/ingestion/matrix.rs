//! Date × group grid parser
//!
//! Fixed sheet structure: group names on row 10 from column C through T,
//! dates in column A, entries from row 12 down.

use once_cell::sync::Lazy;
use regex::Regex;

use super::dates::normalize_date;
use super::segmenter::{has_remote_marker, segment_cell, REMOTE_NOTE};
use super::workbook::{CellValue, Sheet};
use crate::types::{ExamKind, RecordFields, RecordSource, ScheduleRecord};

/// 1-based row holding group names
pub const HEADER_ROW: u32 = 10;
/// 1-based row of the first entry
pub const DATA_START_ROW: u32 = 12;
/// 1-based column holding the date
pub const DATE_COL: u32 = 1;
/// 1-based column of the first group (C)
pub const GROUP_COL_START: u32 = 3;
/// 1-based column of the last group (T)
pub const GROUP_COL_END: u32 = 20;

/// Cell texts meaning "no exam on this day"
const SKIP_VALUES: [&str; 3] = ["занятия", "зачетная неделя", "каникулы"];

/// Prefixes of practicum / placement periods (and bare consultation entries)
const SKIP_PREFIXES: [&str; 6] = [
    "консультация",
    "практика",
    "эксплуатационная",
    "технологическая",
    "научно-исследовательская",
    "педагогическая",
];

static CONSULTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)консульт").expect("valid regex"));
static CREDIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)зач[её]т").expect("valid regex"));
static DIFF_CREDIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)диф").expect("valid regex"));

/// One grid row below the header
#[derive(Debug, Clone)]
pub struct MatrixRow {
    /// 1-based spreadsheet row
    pub row: u32,
    pub date: CellValue,
    /// One cell per group column, aligned with [`MatrixSheet::groups`]
    pub cells: Vec<CellValue>,
}

/// A grid sheet: group header plus data rows
#[derive(Debug, Clone)]
pub struct MatrixSheet {
    pub groups: Vec<Option<String>>,
    pub rows: Vec<MatrixRow>,
}

impl MatrixSheet {
    /// Extract the header and data rows at their fixed positions
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let group_cols = (GROUP_COL_START - 1)..GROUP_COL_END;

        let groups = group_cols
            .clone()
            .map(|col| sheet.cell(HEADER_ROW - 1, col).as_opt_text())
            .collect();

        let rows = ((DATA_START_ROW - 1)..sheet.row_count())
            .map(|row| MatrixRow {
                row: row + 1,
                date: sheet.cell(row, DATE_COL - 1).clone(),
                cells: group_cols.clone().map(|col| sheet.cell(row, col).clone()).collect(),
            })
            .collect();

        Self { groups, rows }
    }
}

/// Whether a cell denotes a non-exam period and must not produce a record
pub fn is_skip_value(text: &str) -> bool {
    let low = text.trim().to_lowercase();
    SKIP_VALUES.contains(&low.as_str()) || SKIP_PREFIXES.iter().any(|p| low.starts_with(p))
}

/// Exam kind for a non-consultation cell; the differentiated check runs last and wins
pub fn classify_exam_cell(text: &str) -> ExamKind {
    let mut kind = ExamKind::Exam;
    if CREDIT.is_match(text) {
        kind = ExamKind::Credit;
    }
    if DIFF_CREDIT.is_match(text) {
        kind = ExamKind::DiffCredit;
    }
    kind
}

/// Fields of one non-empty, non-skipped cell
pub fn classify_cell(text: &str) -> RecordFields {
    if CONSULTATION.is_match(text) {
        return RecordFields {
            kind: Some(ExamKind::Consultation),
            notes: has_remote_marker(text).then(|| REMOTE_NOTE.to_string()),
            ..Default::default()
        };
    }

    let segments = segment_cell(text);
    RecordFields {
        kind: Some(classify_exam_cell(text)),
        room: segments.room,
        subject: segments.subject,
        teacher: segments.teacher,
        notes: segments.notes,
        ..Default::default()
    }
}

/// A date cell that leaves its row without a date: blank, `0` or `FALSE`
fn is_missing_date(cell: &CellValue) -> bool {
    match cell {
        CellValue::Number(n) => *n == 0.0,
        CellValue::Bool(b) => !b,
        other => other.is_blank(),
    }
}

/// Parse a grid sheet into records
pub fn parse_matrix(sheet_name: &str, grid: &MatrixSheet) -> Vec<ScheduleRecord> {
    let mut records = Vec::new();

    for row in &grid.rows {
        if is_missing_date(&row.date) {
            continue;
        }
        let date = normalize_date(&row.date);

        for (group, cell) in grid.groups.iter().zip(&row.cells) {
            let text = cell.as_text();
            if text.is_empty() {
                continue;
            }
            if is_skip_value(&text) {
                tracing::debug!("[{}] row {}: skipping '{}'", sheet_name, row.row, text);
                continue;
            }

            let fields = RecordFields {
                date: date.clone(),
                group: group.clone(),
                ..classify_cell(&text)
            };

            records.push(ScheduleRecord::new(
                fields,
                RecordSource {
                    sheet: sheet_name.to_string(),
                    row: row.row,
                },
            ));
        }
    }

    records
}
