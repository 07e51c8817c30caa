//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::Config;
use crate::oracle::Oracle;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Oracle summary source, owns the history writer
    pub oracle: Arc<Oracle>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let oracle = Arc::new(Oracle::new(&config.oracle));
        Self {
            config: Arc::new(config),
            oracle,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Path of the metrics document the page loads
    pub fn document_path(&self) -> PathBuf {
        self.config.server.document_path()
    }
}
