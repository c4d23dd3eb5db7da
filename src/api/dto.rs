//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::dashboard::{Component, OutputUpdate};

// ============================================
// UPDATE DTOs
// ============================================

/// Control values posted by the browser
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    /// Current value of every control, by id
    #[serde(default)]
    pub inputs: HashMap<String, Value>,
    /// Ids of the controls that changed; empty on first load
    #[serde(default)]
    pub changed: Vec<String>,
}

/// Values produced by the callbacks that ran
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub outputs: Vec<OutputUpdate>,
    pub meta: UpdateMeta,
}

/// Update execution metadata
#[derive(Debug, Serialize)]
pub struct UpdateMeta {
    /// Time spent in callbacks
    pub execution_time_ms: u64,
    /// Callbacks that ran, in order
    pub callbacks_run: Vec<String>,
}

// ============================================
// LAYOUT DTOs
// ============================================

/// Dashboard layout as JSON
#[derive(Debug, Serialize)]
pub struct LayoutResponse<'a> {
    pub title: &'a str,
    pub layout: &'a Component,
    /// Control ids, in layout order
    pub controls: Vec<String>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy
    pub status: String,
    /// Dashboard served by this process
    pub dashboard: String,
    /// Number of registered callbacks
    pub callbacks: usize,
    /// Whether a boundary document is loaded
    pub boundaries: bool,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_defaults() {
        let req: UpdateRequest = serde_json::from_str("{}").unwrap();
        assert!(req.inputs.is_empty());
        assert!(req.changed.is_empty());

        let req: UpdateRequest = serde_json::from_str(
            r#"{"inputs": {"date-slider": [0, 5]}, "changed": ["date-slider"]}"#,
        )
        .unwrap();
        assert_eq!(req.inputs["date-slider"], serde_json::json!([0, 5]));
        assert_eq!(req.changed, vec!["date-slider"]);
    }
}
