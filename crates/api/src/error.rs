//! Error types for the HTTP API.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marketplace_core::MarketError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by request handlers.
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Malformed or rejected input.
    #[error("{0}")]
    BadRequest(String),

    /// Store or unexpected failure.
    #[error("{0}")]
    Internal(String),
}

impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            MarketError::NotFound { entity, .. } => ApiError::NotFound(format!("{} not found", entity)),
            MarketError::Validation(err) => ApiError::BadRequest(err.to_string()),
            other => {
                error!(error = %other, "Marketplace operation failed");
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized(msg) => {
                warn!(reason = %msg, "Unauthorized request");
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
