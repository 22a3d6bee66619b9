use thiserror::Error;

/// Maximum length of an upstream error body kept in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Errors talking to the upstream quest API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Discord API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),

    #[error("Credential is not a valid header value")]
    InvalidCredential,

    #[error("Invalid request header {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
}

impl UpstreamError {
    /// Build a status error, truncating the body to keep logs readable
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let body = if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        };
        UpstreamError::Status { status, body }
    }
}
