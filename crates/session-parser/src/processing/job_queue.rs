//! Job registry and FIFO hand-off to the worker
//!
//! Jobs live in memory only; a restart loses queued and in-flight jobs.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Job lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// `completed` and `failed` never change
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Allowed moves: queued → processing → completed | failed
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Processing)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry for one job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: Uuid,
    pub status: JobStatus,
    pub original_file_name: String,
    pub upload_path: PathBuf,
    pub result_path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl JobRecord {
    pub fn new(id: Uuid, original_file_name: String, upload_path: PathBuf, result_path: PathBuf) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            original_file_name,
            upload_path,
            result_path,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            error: None,
        }
    }
}

/// Work item handed to the worker
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub original_file_name: String,
    pub upload_path: PathBuf,
}

impl From<&JobRecord> for Job {
    fn from(record: &JobRecord) -> Self {
        Self {
            id: record.id,
            original_file_name: record.original_file_name.clone(),
            upload_path: record.upload_path.clone(),
        }
    }
}

/// In-memory job registry feeding a worker channel
pub struct JobQueue {
    /// All known jobs
    jobs: Arc<DashMap<Uuid, JobRecord>>,
    /// Channel to the worker
    sender: mpsc::UnboundedSender<Job>,
    /// Worker slots
    worker_count: usize,
    /// Jobs currently in `processing`
    active: AtomicUsize,
    /// Highest `active` value seen
    peak_active: AtomicUsize,
}

impl JobQueue {
    /// Create a queue and the receiver its worker drains
    pub fn new(worker_count: usize) -> (Self, mpsc::UnboundedReceiver<Job>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let queue = Self {
            jobs: Arc::new(DashMap::new()),
            sender,
            worker_count: worker_count.max(1),
            active: AtomicUsize::new(0),
            peak_active: AtomicUsize::new(0),
        };

        (queue, receiver)
    }

    /// Register a queued job and hand it to the worker
    ///
    /// The entry is visible to lookups before the worker can see the job.
    pub fn submit(&self, record: JobRecord) -> Result<JobRecord> {
        let job = Job::from(&record);
        let job_id = record.id;
        self.jobs.insert(job_id, record.clone());

        if let Err(e) = self.sender.send(job) {
            self.jobs.remove(&job_id);
            tracing::error!("Failed to enqueue job {}: {}", job_id, e);
            return Err(Error::internal("job worker is not running"));
        }

        tracing::info!("Job {} queued ({})", job_id, record.original_file_name);
        Ok(record)
    }

    /// Snapshot of one job
    pub fn get(&self, job_id: Uuid) -> Option<JobRecord> {
        self.jobs.get(&job_id).map(|r| r.clone())
    }

    /// Snapshot of all jobs, oldest first
    pub fn list(&self) -> Vec<JobRecord> {
        let mut jobs: Vec<JobRecord> = self.jobs.iter().map(|e| e.value().clone()).collect();
        jobs.sort_by_key(|j| j.created_at);
        jobs
    }

    /// queued → processing
    pub fn mark_processing(&self, job_id: Uuid) -> bool {
        let moved = self.transition(job_id, JobStatus::Processing, |record| {
            record.started_at = Some(Utc::now());
        });
        if moved {
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_active.fetch_max(active, Ordering::SeqCst);
            tracing::info!("Job {} processing", job_id);
        }
        moved
    }

    /// processing → completed
    pub fn mark_completed(&self, job_id: Uuid) -> bool {
        let moved = self.transition(job_id, JobStatus::Completed, |record| {
            record.finished_at = Some(Utc::now());
        });
        if moved {
            self.active.fetch_sub(1, Ordering::SeqCst);
            tracing::info!("Job {} completed", job_id);
        }
        moved
    }

    /// processing → failed, capturing the error text
    pub fn mark_failed(&self, job_id: Uuid, error: String) -> bool {
        let message = error.clone();
        let moved = self.transition(job_id, JobStatus::Failed, move |record| {
            record.finished_at = Some(Utc::now());
            record.error = Some(error);
        });
        if moved {
            self.active.fetch_sub(1, Ordering::SeqCst);
            tracing::error!("Job {} failed: {}", job_id, message);
        }
        moved
    }

    /// Apply a status change if the lifecycle allows it
    fn transition(&self, job_id: Uuid, next: JobStatus, update: impl FnOnce(&mut JobRecord)) -> bool {
        let Some(mut record) = self.jobs.get_mut(&job_id) else {
            tracing::warn!("Ignoring {} transition for unknown job {}", next, job_id);
            return false;
        };

        if !record.status.can_transition_to(next) {
            tracing::warn!(
                "Ignoring illegal transition {} -> {} for job {}",
                record.status,
                next,
                job_id
            );
            return false;
        }

        record.status = next;
        update(&mut record);
        true
    }

    /// Get queue statistics
    pub fn stats(&self) -> QueueStats {
        let mut stats = QueueStats {
            total_jobs: self.jobs.len(),
            worker_count: self.worker_count,
            peak_processing: self.peak_active.load(Ordering::SeqCst),
            ..Default::default()
        };

        for job in self.jobs.iter() {
            match job.status {
                JobStatus::Queued => stats.queued += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::Failed => stats.failed += 1,
            }
        }

        stats
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

/// Queue statistics
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub total_jobs: usize,
    pub queued: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub worker_count: usize,
    /// Most jobs ever observed in `processing` at once
    pub peak_processing: usize,
}
