//! Schedule record types with source tracking

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of assessment a schedule entry describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamKind {
    Exam,
    Credit,
    DiffCredit,
    Consultation,
    Retake,
    Other,
}

impl ExamKind {
    /// All kinds, in declaration order
    pub const ALL: [ExamKind; 6] = [
        ExamKind::Exam,
        ExamKind::Credit,
        ExamKind::DiffCredit,
        ExamKind::Consultation,
        ExamKind::Retake,
        ExamKind::Other,
    ];

    /// Serialized token (`EXAM`, `DIFF_CREDIT`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exam => "EXAM",
            Self::Credit => "CREDIT",
            Self::DiffCredit => "DIFF_CREDIT",
            Self::Consultation => "CONSULTATION",
            Self::Retake => "RETAKE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for ExamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start/end time of an entry (`HH:mm`); not extracted yet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Where the entry takes place
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub room: Option<String>,
    /// Always `None` for now
    pub building: Option<String>,
}

/// Traceability back to the spreadsheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordSource {
    /// Worksheet name
    pub sheet: String,
    /// 1-based spreadsheet row number
    pub row: u32,
}

/// One schedule entry extracted from a sheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleRecord {
    /// Content hash, see [`crate::ingestion::record_id`]
    pub id: String,
    /// ISO `YYYY-MM-DD`
    pub date: Option<String>,
    pub time: TimeRange,
    pub group: Option<String>,
    pub subject: Option<String>,
    pub kind: ExamKind,
    pub teacher: Option<String>,
    pub location: Location,
    pub notes: Option<String>,
    pub source: RecordSource,
}

/// Extracted field values of a record, before an id is assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFields {
    pub date: Option<String>,
    pub group: Option<String>,
    pub subject: Option<String>,
    pub kind: Option<ExamKind>,
    pub teacher: Option<String>,
    pub room: Option<String>,
    pub notes: Option<String>,
}

impl ScheduleRecord {
    /// Build a record from extracted fields, deriving its id from content.
    ///
    /// A missing kind falls back to `OTHER`.
    pub fn new(fields: RecordFields, source: RecordSource) -> Self {
        let kind = fields.kind.unwrap_or(ExamKind::Other);
        let id = crate::ingestion::record_id(&source.sheet, &fields, kind);

        Self {
            id,
            date: fields.date,
            time: TimeRange::default(),
            group: fields.group,
            subject: fields.subject,
            kind,
            teacher: fields.teacher,
            location: Location {
                room: fields.room,
                building: None,
            },
            notes: fields.notes,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serialization() {
        for kind in ExamKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_record_json_shape() {
        let record = ScheduleRecord::new(
            RecordFields {
                date: Some("2024-01-15".to_string()),
                group: Some("ИВТ-21".to_string()),
                room: Some("305".to_string()),
                kind: Some(ExamKind::Exam),
                ..Default::default()
            },
            RecordSource { sheet: "Лист1".to_string(), row: 12 },
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kind"], "EXAM");
        assert_eq!(value["location"]["room"], "305");
        assert!(value["location"]["building"].is_null());
        assert!(value["time"]["start"].is_null());
        assert_eq!(value["source"]["row"], 12);
        assert!(value["id"].as_str().unwrap().starts_with("sha256:"));
    }

    #[test]
    fn test_missing_kind_defaults_to_other() {
        let record = ScheduleRecord::new(
            RecordFields::default(),
            RecordSource { sheet: "Лист2".to_string(), row: 2 },
        );
        assert_eq!(record.kind, ExamKind::Other);
    }
}
