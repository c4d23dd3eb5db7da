//! Page Routes
//!
//! - GET / - Dashboard HTML page
//! - GET /api/v1/layout - Layout tree as JSON

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::LayoutResponse;
use crate::api::state::AppState;

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.dashboard.render_page())
}

/// GET /api/v1/layout
pub async fn layout(State(state): State<Arc<AppState>>) -> Response {
    let dashboard = &state.dashboard;
    Json(LayoutResponse {
        title: dashboard.title(),
        layout: dashboard.layout(),
        controls: dashboard.control_ids(),
    })
    .into_response()
}
