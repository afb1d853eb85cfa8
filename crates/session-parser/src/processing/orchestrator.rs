//! Job orchestration: submission, status and result lookups

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ProcessingConfig;
use crate::error::{Error, Result};
use crate::storage::ScheduleStore;
use crate::types::{ScheduleDocument, ScheduleMemory};

use super::job_queue::{JobQueue, JobRecord, JobStatus, QueueStats};
use super::worker::ProcessingWorker;

/// Upload extension used when the original name has none
pub const DEFAULT_UPLOAD_EXTENSION: &str = "xlsx";

/// Accepts workbook uploads and tracks their parse jobs
pub struct JobOrchestrator {
    queue: Arc<JobQueue>,
    store: Arc<dyn ScheduleStore>,
}

impl JobOrchestrator {
    /// Prepare storage and spawn the worker on the current runtime
    pub async fn start(config: &ProcessingConfig, store: Arc<dyn ScheduleStore>) -> Result<Self> {
        store.ensure_layout().await?;

        let (queue, receiver) = JobQueue::new(config.max_parallel_tasks);
        let queue = Arc::new(queue);

        let worker = ProcessingWorker::new(queue.clone(), store.clone());
        tokio::spawn(worker.run(receiver));

        Ok(Self { queue, store })
    }

    /// Persist an upload and queue it; returns as soon as the job is queued
    pub async fn submit(&self, data: &[u8], original_name: &str) -> Result<JobRecord> {
        let original_name = original_name.trim();
        if original_name.is_empty() {
            return Err(Error::validation("File name is required"));
        }
        if data.is_empty() {
            return Err(Error::validation("Uploaded file is empty"));
        }

        let id = Uuid::new_v4();
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_EXTENSION);

        let upload_path = self.store.store_upload(id, extension, data).await?;
        let record = JobRecord::new(
            id,
            original_name.to_string(),
            upload_path.clone(),
            self.store.result_path(id),
        );

        match self.queue.submit(record) {
            Ok(record) => Ok(record),
            Err(e) => {
                if let Err(cleanup) = self.store.discard_upload(&upload_path).await {
                    tracing::warn!("Could not remove upload {}: {}", upload_path.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    /// Current snapshot of a job
    pub fn status(&self, id: Uuid) -> Result<JobRecord> {
        self.queue.get(id).ok_or(Error::JobNotFound(id))
    }

    /// The persisted document of a completed job
    pub async fn result(&self, id: Uuid) -> Result<ScheduleDocument> {
        let job = self.completed_job(id)?;
        let bytes = self.store.read_result(&job.result_path).await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::persistence(&job.result_path, e))
    }

    /// Condensed summary of a completed job's document
    pub async fn memory(&self, id: Uuid) -> Result<ScheduleMemory> {
        Ok(self.result(id).await?.memory())
    }

    /// All jobs, oldest first
    pub fn list(&self) -> Vec<JobRecord> {
        self.queue.list()
    }

    pub fn stats(&self) -> QueueStats {
        self.queue.stats()
    }

    fn completed_job(&self, id: Uuid) -> Result<JobRecord> {
        let job = self.status(id)?;
        match job.status {
            JobStatus::Completed => Ok(job),
            JobStatus::Failed => Err(Error::JobFailed {
                id,
                details: job.error.unwrap_or_else(|| "unknown error".to_string()),
            }),
            status => Err(Error::JobNotCompleted { id, status }),
        }
    }
}
