use crate::persistence::StoreError;
use crate::upstream::UpstreamError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for relay operations
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),
}

impl RelayError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Every failure reaches the caller as the same 500 shape; detail stays in the logs
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self, "Request failed: {}", self);

        let status = self.status_code();
        let body = Json(json!({
            "error": "Something went wrong!",
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;
