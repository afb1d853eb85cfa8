//! Sheet layout detection and typed row extraction

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::flat::FlatRow;
use super::matrix::MatrixSheet;
use super::workbook::Sheet;

/// Sheet name that is always treated as a date × group grid
pub const DEFAULT_MATRIX_SHEET: &str = "Лист1";

static SCHEDULE_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)расписание").expect("valid regex"));

/// How a sheet lays out its entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SheetLayout {
    /// Rows are dates, columns are groups
    Matrix,
    /// One entry per row with named columns
    Flat,
}

/// Choose the layout from the A1 title cell or the sheet name
pub fn detect_layout(sheet: &Sheet) -> SheetLayout {
    let title = sheet.cell(0, 0).as_text();
    if SCHEDULE_TITLE.is_match(&title) || sheet.name == DEFAULT_MATRIX_SHEET {
        SheetLayout::Matrix
    } else {
        SheetLayout::Flat
    }
}

/// A sheet's rows in the schema of its layout
#[derive(Debug, Clone)]
pub enum SheetRows {
    Matrix(MatrixSheet),
    Flat(Vec<FlatRow>),
}

impl SheetRows {
    /// Detect the layout and extract rows accordingly
    pub fn from_sheet(sheet: &Sheet) -> Self {
        match detect_layout(sheet) {
            SheetLayout::Matrix => Self::Matrix(MatrixSheet::from_sheet(sheet)),
            SheetLayout::Flat => Self::Flat(FlatRow::from_sheet(sheet)),
        }
    }

    pub fn layout(&self) -> SheetLayout {
        match self {
            Self::Matrix(_) => SheetLayout::Matrix,
            Self::Flat(_) => SheetLayout::Flat,
        }
    }
}
