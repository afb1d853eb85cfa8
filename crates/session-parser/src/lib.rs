//! session-parser: exam and credit schedule workbooks to structured documents
//!
//! Workbooks come in two layouts: a date × group grid and a one-entry-per-row
//! table. Both are reduced to one record model with stable content ids, a
//! summary, and an async job orchestrator that parses uploads under a
//! configurable concurrency bound.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod server;
pub mod storage;
pub mod types;

pub use config::ParserConfig;
pub use error::{Error, Result};
pub use ingestion::ScheduleParser;
pub use processing::{JobOrchestrator, JobRecord, JobStatus};
pub use storage::{LocalFileStore, ScheduleStore};
pub use types::{ExamKind, ScheduleDocument, ScheduleMemory, ScheduleRecord, ScheduleSummary};
