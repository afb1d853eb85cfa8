//! Job file storage: uploaded workbooks and result documents

mod local;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;

pub use local::LocalFileStore;

/// Storage for job inputs and outputs
///
/// Implementations:
/// - `LocalFileStore`: local filesystem
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Create whatever directories or buckets the store needs
    async fn ensure_layout(&self) -> Result<()>;

    /// Persist an uploaded workbook for a job
    ///
    /// Returns the path the bytes were written to
    async fn store_upload(&self, job_id: Uuid, extension: &str, data: &[u8]) -> Result<PathBuf>;

    /// Read an uploaded workbook back
    async fn read_upload(&self, path: &Path) -> Result<Vec<u8>>;

    /// Remove an upload whose job was never queued
    async fn discard_upload(&self, path: &Path) -> Result<()>;

    /// Path a job's result document is (or will be) stored at
    fn result_path(&self, job_id: Uuid) -> PathBuf;

    /// Persist a job's serialized result document
    async fn store_result(&self, job_id: Uuid, data: &[u8]) -> Result<PathBuf>;

    /// Read a serialized result document
    async fn read_result(&self, path: &Path) -> Result<Vec<u8>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
