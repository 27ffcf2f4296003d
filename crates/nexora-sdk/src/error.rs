//! SDK error types

use crate::notification::NotifyError;
use crate::retry::RetryError;
use nexora_llm::LLMError;
use nexora_repository::RepositoryError;
use nexora_retrieval::RetrievalError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Engine or collaborator misconfigured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No profile for the user id
    #[error("User profile not found: {user_id}")]
    UserNotFound { user_id: String },

    /// Event failed validation
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Knowledge retriever failed after retries
    #[error("Knowledge retrieval failed: {0}")]
    Retrieval(#[source] RetryError<RetrievalError>),

    /// Text generation service failed after retries
    #[error("Generation service failed: {0}")]
    Service(#[source] RetryError<LLMError>),

    /// SMS delivery failed after retries
    #[error("Notification failed: {0}")]
    Notification(#[source] RetryError<NotifyError>),

    /// Accept or dismiss without a recommendation on screen
    #[error("No pending recommendation")]
    NoPendingRecommendation,

    /// Interaction log read or write failed
    #[error("Interaction log error: {0}")]
    InteractionLog(#[source] RepositoryError),
}

impl SdkError {
    /// Message safe to show an end user
    ///
    /// Never includes upstream error text.
    pub fn user_message(&self) -> &'static str {
        match self {
            SdkError::Configuration(_) => "The service is not configured correctly.",
            SdkError::UserNotFound { .. } => "User profile not found.",
            SdkError::InvalidEvent(_) => "The transaction event is invalid.",
            SdkError::Retrieval(_) => "Product information is temporarily unavailable.",
            SdkError::Service(_) => "The recommendation service is temporarily unavailable.",
            SdkError::Notification(_) => "The SMS could not be sent. Please try again.",
            SdkError::NoPendingRecommendation => "There is no recommendation to act on.",
            SdkError::InteractionLog(_) => "The interaction could not be recorded.",
        }
    }
}

impl From<nexora_core::CoreError> for SdkError {
    fn from(err: nexora_core::CoreError) -> Self {
        match err {
            nexora_core::CoreError::InvalidEvent(msg) => SdkError::InvalidEvent(msg),
            other => SdkError::InvalidEvent(other.to_string()),
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
