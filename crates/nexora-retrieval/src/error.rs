//! Retrieval error types

use thiserror::Error;

/// Retrieval errors
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The embedding request did not complete
    #[error("Embedding request failed: {0}")]
    Embedding(String),

    /// The embedding API answered with an error status
    #[error("Embedding API error ({status}): {message}")]
    EmbeddingApi { status: u16, message: String },

    /// The embedding API answered with something that is not a usable vector
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),

    /// The vector store could not be reached or was overloaded
    #[error("Vector store error: {0}")]
    Store(String),

    /// The vector store refused the request, e.g. a missing collection
    #[error("Vector store rejected request: {0}")]
    StoreRejected(String),

    /// The caller asked for something that can never succeed
    #[error("Invalid retrieval request: {0}")]
    InvalidRequest(String),
}

impl RetrievalError {
    /// Only failures another attempt could fix: transport errors, 429 and 5xx
    pub fn is_retryable(&self) -> bool {
        match self {
            RetrievalError::Embedding(_) | RetrievalError::Store(_) => true,
            RetrievalError::EmbeddingApi { status, .. } => *status == 429 || *status >= 500,
            RetrievalError::InvalidResponse(_)
            | RetrievalError::StoreRejected(_)
            | RetrievalError::InvalidRequest(_) => false,
        }
    }
}

/// Result type for retrieval operations
pub type RetrievalResult<T> = std::result::Result<T, RetrievalError>;

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        RetrievalError::Embedding(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for RetrievalError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        let transient = match &err {
            qdrant_client::QdrantError::ResponseError { status } => {
                grpc_code_is_transient(status.code() as i32)
            }
            _ => false,
        };

        if transient {
            RetrievalError::Store(err.to_string())
        } else {
            RetrievalError::StoreRejected(err.to_string())
        }
    }
}

/// gRPC codes worth another attempt
///
/// CANCELLED, UNKNOWN, DEADLINE_EXCEEDED, RESOURCE_EXHAUSTED, ABORTED,
/// INTERNAL and UNAVAILABLE. NOT_FOUND (missing collection), auth and
/// argument errors are final.
fn grpc_code_is_transient(code: i32) -> bool {
    matches!(code, 1 | 2 | 4 | 8 | 10 | 13 | 14)
}
