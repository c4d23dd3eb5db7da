//! Update Route
//!
//! - POST /api/v1/update - Run the callbacks affected by a control change

use axum::{extract::State, Json};
use std::sync::Arc;
use std::time::Instant;

use crate::api::dto::{UpdateMeta, UpdateRequest, UpdateResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// POST /api/v1/update
///
/// The browser sends every control value on each change, so the server
/// keeps no per-session state.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateRequest>,
) -> ApiResult<Json<UpdateResponse>> {
    let start = Instant::now();

    let dashboard = Arc::clone(&state.dashboard);
    let dispatch = tokio::task::spawn_blocking(move || dashboard.update(&req.inputs, &req.changed))
        .await
        .map_err(|e| ApiError::Internal(format!("Update task failed: {}", e)))??;

    let execution_time_ms = start.elapsed().as_millis() as u64;
    tracing::debug!(
        callbacks = ?dispatch.callbacks_run,
        execution_time_ms,
        "Update complete"
    );

    Ok(Json(UpdateResponse {
        outputs: dispatch.outputs,
        meta: UpdateMeta {
            execution_time_ms,
            callbacks_run: dispatch.callbacks_run,
        },
    }))
}
