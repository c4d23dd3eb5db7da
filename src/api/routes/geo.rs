//! Geo Route
//!
//! - GET /api/v1/geo - Boundary document loaded at startup

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/v1/geo
pub async fn boundaries(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let doc = state
        .dashboard
        .boundaries()
        .ok_or_else(|| ApiError::NotFound("no boundary document loaded".to_string()))?;

    Ok(Json(doc.raw().as_ref()).into_response())
}
