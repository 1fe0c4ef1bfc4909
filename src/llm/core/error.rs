//! Error types for the LLM layer

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when using text or image providers
#[derive(Debug, Error)]
pub enum LlmError {
    /// Authentication/token issues
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// HTTP request failures
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// SSE stream parsing failures
    #[error("Stream error: {0}")]
    StreamError(String),

    /// JSON or base64 decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    RateLimitExceeded { retry_after: Option<Duration> },

    /// Provider-specific errors
    #[error("Provider error ({code}): {message}")]
    ProviderError { code: String, message: String },
}

impl LlmError {
    /// Build the error for a non-success HTTP response.
    ///
    /// 429 becomes `RateLimitExceeded`, using the `Retry-After` header (seconds) when present.
    pub fn from_status(status: u16, retry_after: Option<&str>, body: String) -> Self {
        if status == 429 {
            let retry_after = retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return LlmError::RateLimitExceeded { retry_after };
        }
        LlmError::HttpError { status, body }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<base64::DecodeError> for LlmError {
    fn from(err: base64::DecodeError) -> Self {
        LlmError::SerializationError(format!("Invalid base64 payload: {}", err))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::HttpError {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
