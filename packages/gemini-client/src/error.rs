//! Error types for the Gemini client

use thiserror::Error;

/// Errors that can occur when calling the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize/deserialize JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Gemini API returned a non-success status
    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response carried no usable candidate text
    #[error("empty Gemini response: {0}")]
    EmptyResponse(String),

    /// Request timeout
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection refused
    #[error("connection refused to Gemini endpoint {0}")]
    ConnectionRefused(String),

    /// All retry attempts exhausted
    #[error("all {attempts} retry attempts failed. Last error: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl GeminiError {
    /// Check if this error is retryable (transient)
    ///
    /// Retries on timeouts, connection failures and server errors (5xx or
    /// 429). Client errors and malformed payloads are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeminiError::Timeout(_) | GeminiError::ConnectionRefused(_) => true,
            GeminiError::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                matches!(e.status(), Some(status) if status.is_server_error())
            }
            GeminiError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;
