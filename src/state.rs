//! Application state management

use std::io;
use std::sync::Arc;

use chrono::Duration;

use crate::config::Config;
use crate::ocr::OcrService;
use crate::storage::Workspace;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    workspace: Workspace,
    ocr: OcrService,
}

impl AppState {
    /// Create a new application state: open the workspace roots, sweep
    /// leftovers from a previous run, and assemble the OCR chain.
    pub fn new(config: Config) -> io::Result<Self> {
        let ocr = OcrService::new(config.ocr_config());
        Self::with_ocr(config, ocr)
    }

    /// Like [`AppState::new`] but with a caller-built OCR chain.
    pub fn with_ocr(config: Config, ocr: OcrService) -> io::Result<Self> {
        let workspace = Workspace::open(&config.storage.upload_dir, &config.storage.temp_dir)?;
        if let Err(e) = workspace.sweep_stale(Duration::minutes(config.storage.retention_minutes)) {
            tracing::warn!("Startup sweep failed: {}", e);
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                workspace,
                ocr,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the workspace
    pub fn workspace(&self) -> &Workspace {
        &self.inner.workspace
    }

    /// Get the OCR service
    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }
}
