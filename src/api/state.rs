//! Application State
//!
//! Shared state accessible by all API handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::dashboard::Dashboard;

/// Shared application state for all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// The dashboard this process serves
    pub dashboard: Arc<Dashboard>,
    /// Listen address
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(dashboard: Dashboard, config: ServerConfig) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
