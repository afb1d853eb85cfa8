//! Spreadsheet date values to ISO `YYYY-MM-DD`

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::workbook::CellValue;

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

static SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2,4})$").expect("valid regex"));

/// Day zero of the spreadsheet serial date system (1899-12-30)
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch date")
}

/// Normalize a cell value to an ISO date, or `None` if it is not a date
pub fn normalize_date(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Number(serial) => serial_to_iso(*serial),
        CellValue::Text(text) => text_to_iso(text),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Convert a serial day count to a calendar date.
///
/// One whole unit is one day; a fractional part is a time of day and is dropped.
pub fn serial_to_iso(serial: f64) -> Option<String> {
    if !serial.is_finite() {
        return None;
    }

    let days = serial.floor();
    if days.abs() > i32::MAX as f64 {
        return None;
    }

    serial_epoch()
        .checked_add_signed(Duration::days(days as i64))
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Convert textual dates: ISO passes through, `M/D/YY(YY)` is reordered
pub fn text_to_iso(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if ISO_DATE.is_match(trimmed) {
        return Some(trimmed.to_string());
    }

    let caps = SLASH_DATE.captures(trimmed)?;
    let month = &caps[1];
    let day = &caps[2];
    let year = &caps[3];
    let year = if year.len() == 2 {
        format!("20{}", year)
    } else {
        year.to_string()
    };

    Some(format!("{}-{:0>2}-{:0>2}", year, month, day))
}
