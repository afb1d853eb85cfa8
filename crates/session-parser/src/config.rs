//! Configuration for the schedule parser service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Job file storage configuration
    pub storage: StorageConfig,
    /// Job processing configuration
    pub processing: ProcessingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in megabytes
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            max_upload_mb: 30,
        }
    }
}

impl ServerConfig {
    /// Upload limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage root
    pub root: PathBuf,
    /// Uploaded workbooks (default: `<root>/uploads`)
    pub uploads_dir: Option<PathBuf>,
    /// Result documents (default: `<root>/results`)
    pub results_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./storage"),
            uploads_dir: None,
            results_dir: None,
        }
    }
}

impl StorageConfig {
    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| self.root.join("uploads"))
    }

    pub fn results_dir(&self) -> PathBuf {
        self.results_dir
            .clone()
            .unwrap_or_else(|| self.root.join("results"))
    }
}

/// Processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Jobs processed at the same time (minimum 1)
    pub max_parallel_tasks: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_parallel_tasks: 1,
        }
    }
}

impl ParserConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: ParserConfig =
            toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        Ok(config.clamped())
    }

    /// Apply `PORT`, `STORAGE_DIR`, `MAX_PARALLEL_TASKS` and `MAX_UPLOAD_MB`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unparseable values are ignored
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(dir) = lookup("STORAGE_DIR").filter(|v| !v.trim().is_empty()) {
            self.storage.root = PathBuf::from(dir.trim());
        }
        if let Some(n) = lookup("MAX_PARALLEL_TASKS").and_then(|v| v.trim().parse().ok()) {
            self.processing.max_parallel_tasks = n;
        }
        if let Some(mb) = lookup("MAX_UPLOAD_MB").and_then(|v| v.trim().parse().ok()) {
            self.server.max_upload_mb = mb;
        }
        self.clamped()
    }

    fn clamped(mut self) -> Self {
        self.processing.max_parallel_tasks = self.processing.max_parallel_tasks.max(1);
        self.server.max_upload_mb = self.server.max_upload_mb.max(1);
        self
    }
}
