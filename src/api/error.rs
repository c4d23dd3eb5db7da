//! API Error Types
//!
//! Maps dashboard and server errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::dashboard::{CallbackError, DashboardError};

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Dashboard rejected the update
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Dashboard(e) => match e {
                DashboardError::UnknownComponent(_)
                | DashboardError::NotAControl(_)
                | DashboardError::InvalidValue { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT")
                }
                DashboardError::Callback(CallbackError::MissingInput(_))
                | DashboardError::Callback(CallbackError::TypeMismatch { .. }) => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "CALLBACK_ERROR"),
            },
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "API error occurred"
        );

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::NotFound("geo".into()), StatusCode::NOT_FOUND),
            (
                ApiError::Dashboard(DashboardError::UnknownComponent("ghost".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Dashboard(DashboardError::Callback(CallbackError::OutputArity {
                    callback: "cb".into(),
                    expected: 2,
                    got: 1,
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
