//! Canonical output document (version 1.0)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ScheduleRecord;

/// Output format version
pub const DOCUMENT_VERSION: &str = "1.0";

/// Document metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub source_file_name: String,
    pub parsed_at: DateTime<Utc>,
    pub version: String,
}

/// Inclusive date span covered by the records
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Summary statistics over all records
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    /// Total record count
    pub items: usize,
    /// Sorted, unique group names
    pub groups: Vec<String>,
    pub items_by_group: BTreeMap<String, usize>,
    pub date_range: DateRange,
}

/// Severity of a parse issue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Info,
    Warning,
    Error,
}

/// Location of a parse issue
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

/// Reserved; documents currently carry no issues
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParseIssue {
    pub level: IssueLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<IssueSource>,
}

/// The canonical schedule document persisted per job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDocument {
    pub meta: DocumentMeta,
    pub summary: ScheduleSummary,
    pub items: Vec<ScheduleRecord>,
    pub issues: Vec<ParseIssue>,
}

impl ScheduleDocument {
    /// Assemble a document from records and their summary
    pub fn new(
        source_file_name: impl Into<String>,
        parsed_at: DateTime<Utc>,
        summary: ScheduleSummary,
        items: Vec<ScheduleRecord>,
    ) -> Self {
        Self {
            meta: DocumentMeta {
                source_file_name: source_file_name.into(),
                parsed_at,
                version: DOCUMENT_VERSION.to_string(),
            },
            summary,
            items,
            issues: Vec::new(),
        }
    }

    /// Condensed view of the summary
    pub fn memory(&self) -> ScheduleMemory {
        ScheduleMemory {
            items: self.summary.items,
            groups: self.summary.groups.clone(),
            date_range: self.summary.date_range.clone(),
        }
    }
}

/// Short summary returned by the memory endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMemory {
    pub items: usize,
    pub groups: Vec<String>,
    pub date_range: DateRange,
}
