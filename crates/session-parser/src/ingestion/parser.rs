//! Workbook parser: layout detection, per-sheet extraction, aggregation

use chrono::Utc;
use serde::Serialize;

use super::aggregate::summarize;
use super::flat::parse_flat;
use super::layout::{SheetLayout, SheetRows};
use super::matrix::parse_matrix;
use super::workbook::{read_workbook, Sheet};
use crate::error::Result;
use crate::types::{ScheduleDocument, ScheduleRecord};

/// Outcome of parsing one sheet
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetReport {
    pub sheet_name: String,
    pub layout: SheetLayout,
    pub items: usize,
}

/// Records extracted from a whole workbook
#[derive(Debug, Clone)]
pub struct ParsedWorkbook {
    /// All records, in sheet order then row order
    pub records: Vec<ScheduleRecord>,
    pub sheets: Vec<SheetReport>,
}

/// Schedule workbook parser
pub struct ScheduleParser;

impl ScheduleParser {
    /// Parse workbook bytes into records
    pub fn parse(data: &[u8]) -> Result<ParsedWorkbook> {
        let sheets = read_workbook(data)?;
        Ok(Self::parse_sheets(&sheets))
    }

    /// Parse already-loaded sheets
    pub fn parse_sheets(sheets: &[Sheet]) -> ParsedWorkbook {
        let mut records = Vec::new();
        let mut reports = Vec::with_capacity(sheets.len());

        for sheet in sheets {
            let rows = SheetRows::from_sheet(sheet);
            let layout = rows.layout();
            let items = match &rows {
                SheetRows::Matrix(grid) => parse_matrix(&sheet.name, grid),
                SheetRows::Flat(flat) => parse_flat(&sheet.name, flat),
            };

            tracing::info!(
                "Parsed sheet '{}' as {:?} layout: {} records",
                sheet.name,
                layout,
                items.len()
            );

            reports.push(SheetReport {
                sheet_name: sheet.name.clone(),
                layout,
                items: items.len(),
            });
            records.extend(items);
        }

        ParsedWorkbook {
            records,
            sheets: reports,
        }
    }

    /// Parse workbook bytes into the canonical document
    pub fn parse_document(data: &[u8], source_file_name: &str) -> Result<ScheduleDocument> {
        let parsed = Self::parse(data)?;
        let summary = summarize(&parsed.records);

        Ok(ScheduleDocument::new(
            source_file_name,
            Utc::now(),
            summary,
            parsed.records,
        ))
    }
}
