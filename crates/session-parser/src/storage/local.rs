//! Local filesystem job storage

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::ScheduleStore;
use crate::config::StorageConfig;
use crate::error::{Error, Result};

/// Stores uploads and results as plain files under two directories
pub struct LocalFileStore {
    uploads_dir: PathBuf,
    results_dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(uploads_dir: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            results_dir: results_dir.into(),
        }
    }

    /// Create from config
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.uploads_dir(), config.results_dir())
    }

    /// Create with `uploads/` and `results/` under one root
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(root.join("uploads"), root.join("results"))
    }

    fn upload_path(&self, job_id: Uuid, extension: &str) -> PathBuf {
        let extension = extension.trim_start_matches('.');
        self.uploads_dir.join(format!("{}.{}", job_id, extension))
    }
}

#[async_trait]
impl ScheduleStore for LocalFileStore {
    async fn ensure_layout(&self) -> Result<()> {
        for dir in [&self.uploads_dir, &self.results_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::persistence(dir, e))?;
        }
        Ok(())
    }

    async fn store_upload(&self, job_id: Uuid, extension: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.upload_path(job_id, extension);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| Error::persistence(&path, e))?;
        Ok(path)
    }

    async fn read_upload(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::persistence(path, e))
    }

    async fn discard_upload(&self, path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::persistence(path, e)),
        }
    }

    fn result_path(&self, job_id: Uuid) -> PathBuf {
        self.results_dir.join(format!("{}.json", job_id))
    }

    async fn store_result(&self, job_id: Uuid, data: &[u8]) -> Result<PathBuf> {
        let path = self.result_path(job_id);
        // Readers only ever see a complete document
        let tmp_path = path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, data)
            .await
            .map_err(|e| Error::persistence(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| Error::persistence(&path, e))?;

        Ok(path)
    }

    async fn read_result(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::persistence(path, e))
    }

    fn name(&self) -> &str {
        "local-fs"
    }
}
