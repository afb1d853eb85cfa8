//! Background worker running parse jobs under a concurrency bound

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::error::{Error, Result};
use crate::ingestion::ScheduleParser;
use crate::storage::ScheduleStore;

use super::job_queue::{Job, JobQueue};

/// Pulls jobs in FIFO order and runs at most `worker_count` at once
pub struct ProcessingWorker {
    job_queue: Arc<JobQueue>,
    store: Arc<dyn ScheduleStore>,
    slots: Arc<Semaphore>,
}

impl ProcessingWorker {
    pub fn new(job_queue: Arc<JobQueue>, store: Arc<dyn ScheduleStore>) -> Self {
        let slots = Arc::new(Semaphore::new(job_queue.worker_count()));
        Self {
            job_queue,
            store,
            slots,
        }
    }

    /// Drain the queue until every sender is dropped
    pub async fn run(self, mut receiver: mpsc::UnboundedReceiver<Job>) {
        tracing::info!(
            "Processing worker started: {} parallel tasks, store '{}'",
            self.job_queue.worker_count(),
            self.store.name()
        );

        while let Some(job) = receiver.recv().await {
            // Wait for a free slot before taking the next job, keeping admission FIFO
            let permit = match self.slots.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let job_id = job.id;
            let job_queue = self.job_queue.clone();
            let store = self.store.clone();
            let run = {
                let job_queue = job_queue.clone();
                tokio::spawn(async move { Self::execute(&job_queue, store.as_ref(), job).await })
            };

            tokio::spawn(async move {
                // A panicking job still ends `failed` and frees its slot
                if let Err(e) = run.await {
                    job_queue.mark_failed(job_id, format!("Job aborted: {}", e));
                }
                drop(permit);
            });
        }

        tracing::info!("Processing worker stopped");
    }

    /// Run one job to a terminal state
    async fn execute(job_queue: &JobQueue, store: &dyn ScheduleStore, job: Job) {
        let job_id = job.id;
        if !job_queue.mark_processing(job_id) {
            return;
        }

        let started = std::time::Instant::now();
        match Self::process(store, job).await {
            Ok(items) => {
                tracing::info!(
                    "Job {} produced {} records in {:.2}s",
                    job_id,
                    items,
                    started.elapsed().as_secs_f64()
                );
                job_queue.mark_completed(job_id);
            }
            Err(e) => {
                job_queue.mark_failed(job_id, e.to_string());
            }
        }
    }

    /// Read the upload, parse it off the async runtime, persist the document
    async fn process(store: &dyn ScheduleStore, job: Job) -> Result<usize> {
        let data = store.read_upload(&job.upload_path).await?;

        let file_name = job.original_file_name.clone();
        let document = tokio::task::spawn_blocking(move || {
            ScheduleParser::parse_document(&data, &file_name)
        })
        .await
        .map_err(|e| Error::internal(format!("Parse task aborted: {}", e)))??;

        let items = document.items.len();
        let json = serde_json::to_vec_pretty(&document)?;
        store.store_result(job.id, &json).await?;

        Ok(items)
    }
}
