//! One-entry-per-row sheet parser
//!
//! The first used row holds column names; each following row is one schedule entry.
//! A teacher cell left blank inherits the teacher from the rows above it.

use once_cell::sync::Lazy;
use regex::Regex;

use super::dates::normalize_date;
use super::workbook::{CellValue, Sheet};
use crate::types::{ExamKind, RecordFields, RecordSource, ScheduleRecord};

/// Column titles of the flat layout
pub const TEACHER_COLUMN: &str = "ФИО";
pub const DATE_COLUMN: &str = "Дата";
pub const GROUP_COLUMN: &str = "Группа";
pub const SUBJECT_COLUMN: &str = "Предмет";
pub const CONTROL_COLUMN: &str = "Контроль";

/// Offset from a 0-based data row index to its 1-based spreadsheet row
pub const ROW_OFFSET: u32 = 2;

/// Control keywords, checked in this order
static CONTROL_KINDS: Lazy<Vec<(Regex, ExamKind)>> = Lazy::new(|| {
    [
        (r"экз|exam", ExamKind::Exam),
        (r"диф|diff", ExamKind::DiffCredit),
        (r"зач|credit", ExamKind::Credit),
        (r"конс|consult", ExamKind::Consultation),
        (r"пересда|retake", ExamKind::Retake),
    ]
    .into_iter()
    .map(|(pattern, kind)| {
        let regex = Regex::new(&format!("(?i){}", pattern)).expect("valid regex");
        (regex, kind)
    })
    .collect()
});

/// One data row of a flat sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    /// 1-based spreadsheet row
    pub row: u32,
    pub teacher: Option<String>,
    pub date: CellValue,
    pub group: Option<String>,
    pub subject: Option<String>,
    pub control: Option<String>,
}

/// Column positions resolved from the header row
#[derive(Debug, Default)]
struct FlatColumns {
    teacher: Option<u32>,
    date: Option<u32>,
    group: Option<u32>,
    subject: Option<u32>,
    control: Option<u32>,
}

impl FlatColumns {
    fn from_header(sheet: &Sheet, header_row: u32) -> Self {
        let mut columns = Self::default();
        for col in 0..sheet.column_count() {
            let slot = match sheet.cell(header_row, col).as_text().as_str() {
                TEACHER_COLUMN => &mut columns.teacher,
                DATE_COLUMN => &mut columns.date,
                GROUP_COLUMN => &mut columns.group,
                SUBJECT_COLUMN => &mut columns.subject,
                CONTROL_COLUMN => &mut columns.control,
                _ => continue,
            };
            // First matching column wins
            slot.get_or_insert(col);
        }
        columns
    }
}

impl FlatRow {
    /// Every row below the header, blank rows included
    pub fn from_sheet(sheet: &Sheet) -> Vec<FlatRow> {
        // The header is the first used row, wherever the sheet starts
        let header_row = sheet.first_row();
        let columns = FlatColumns::from_header(sheet, header_row);
        let cell = |row: u32, col: Option<u32>| -> CellValue {
            col.map(|c| sheet.cell(row, c).clone()).unwrap_or(CellValue::Empty)
        };

        (header_row + 1..sheet.row_count())
            .map(|row| FlatRow {
                row: row - header_row - 1 + ROW_OFFSET,
                teacher: cell(row, columns.teacher).as_opt_text(),
                date: cell(row, columns.date),
                group: cell(row, columns.group).as_opt_text(),
                subject: cell(row, columns.subject).as_opt_text(),
                control: cell(row, columns.control).as_opt_text(),
            })
            .collect()
    }
}

/// Classify the control column text
pub fn classify_control(control: Option<&str>) -> ExamKind {
    let Some(text) = control else {
        return ExamKind::Other;
    };

    CONTROL_KINDS
        .iter()
        .find(|(regex, _)| regex.is_match(text))
        .map(|(_, kind)| *kind)
        .unwrap_or(ExamKind::Other)
}

/// Parse flat rows into exactly one record each
pub fn parse_flat(sheet_name: &str, rows: &[FlatRow]) -> Vec<ScheduleRecord> {
    let mut last_teacher: Option<String> = None;

    rows.iter()
        .map(|row| {
            if row.teacher.is_some() {
                last_teacher = row.teacher.clone();
            }

            let fields = RecordFields {
                date: normalize_date(&row.date),
                group: row.group.clone(),
                subject: row.subject.clone(),
                kind: Some(classify_control(row.control.as_deref())),
                teacher: last_teacher.clone(),
                room: None,
                notes: None,
            };

            ScheduleRecord::new(
                fields,
                RecordSource {
                    sheet: sheet_name.to_string(),
                    row: row.row,
                },
            )
        })
        .collect()
}
