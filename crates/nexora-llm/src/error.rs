//! Error types for the Nexora LLM module

use thiserror::Error;

/// Result type alias for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// LLM module errors
#[derive(Debug, Error)]
pub enum LLMError {
    /// Transport-level failure reaching the API
    #[error("External API call failed: {0}")]
    ApiCallFailed(String),

    /// API answered with a non-success status
    #[error("API returned status {status}: {message}")]
    ApiStatus { status: u16, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LLMError {
    /// Whether repeating the same request may succeed
    ///
    /// Transport failures, rate limiting (429) and server errors (5xx) are
    /// transient; everything else fails the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            LLMError::ApiCallFailed(_) => true,
            LLMError::ApiStatus { status, .. } => *status == 429 || *status >= 500,
            LLMError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

impl From<String> for LLMError {
    fn from(s: String) -> Self {
        LLMError::Other(s)
    }
}

impl From<&str> for LLMError {
    fn from(s: &str) -> Self {
        LLMError::Other(s.to_string())
    }
}
