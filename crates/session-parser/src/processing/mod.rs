//! Background processing with a job queue and bounded worker

mod job_queue;
mod orchestrator;
mod worker;

pub use job_queue::{Job, JobQueue, JobRecord, JobStatus, QueueStats};
pub use orchestrator::{JobOrchestrator, DEFAULT_UPLOAD_EXTENSION};
pub use worker::ProcessingWorker;
