//! Core types for the session parser

pub mod document;
pub mod record;

pub use document::{
    DateRange, DocumentMeta, IssueLevel, IssueSource, ParseIssue, ScheduleDocument,
    ScheduleMemory, ScheduleSummary, DOCUMENT_VERSION,
};
pub use record::{ExamKind, Location, RecordFields, RecordSource, ScheduleRecord, TimeRange};
