//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::processing::JobOrchestrator;
use crate::storage::{LocalFileStore, ScheduleStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ParserConfig,
    orchestrator: JobOrchestrator,
}

impl AppState {
    /// Create state backed by local file storage from config
    pub async fn new(config: ParserConfig) -> Result<Self> {
        let store: Arc<dyn ScheduleStore> = Arc::new(LocalFileStore::from_config(&config.storage));
        tracing::info!(
            "Storage: uploads in {:?}, results in {:?}",
            config.storage.uploads_dir(),
            config.storage.results_dir()
        );

        let orchestrator = JobOrchestrator::start(&config.processing, store).await?;
        Ok(Self::with_orchestrator(config, orchestrator))
    }

    /// Create state around an already started orchestrator
    pub fn with_orchestrator(config: ParserConfig, orchestrator: JobOrchestrator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
            }),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.inner.config
    }

    pub fn orchestrator(&self) -> &JobOrchestrator {
        &self.inner.orchestrator
    }
}
