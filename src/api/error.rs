//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analysis::AnalysisError;

/// Wire error body: `{ "error": ..., "detail": ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Completion provider error: {0}")]
    Upstream(String),

    #[error("Model response failed validation: {0}")]
    InvalidCompletion(String),

    #[error("Internal error: {detail}")]
    Internal { detail: String, expose: bool },
}

impl ApiError {
    /// Uncategorized failure. `detail` reaches the client only in debug
    /// operating mode; it is always logged.
    pub fn internal(detail: impl Into<String>, expose: bool) -> Self {
        ApiError::Internal {
            detail: detail.into(),
            expose,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message, None)
            }
            ApiError::Upstream(message) => (
                StatusCode::BAD_GATEWAY,
                "Completion provider error".to_string(),
                Some(message),
            ),
            ApiError::InvalidCompletion(message) => (
                StatusCode::BAD_GATEWAY,
                "Model response failed validation".to_string(),
                Some(message),
            ),
            ApiError::Internal { detail, expose } => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    expose.then_some(detail),
                )
            }
        };

        (status, Json(ErrorBody { error, detail })).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Validation(e) => ApiError::BadRequest(e.to_string()),
            AnalysisError::Provider(e) => ApiError::Upstream(e.to_string()),
            AnalysisError::Parse(e) => ApiError::InvalidCompletion(e.to_string()),
        }
    }
}
