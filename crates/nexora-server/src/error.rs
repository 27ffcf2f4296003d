//! Server error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nexora_sdk::SdkError;
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

/// Server error type
///
/// Messages carried here are returned to clients; upstream error text is
/// logged in the `From<SdkError>` conversion and never stored.
#[derive(Debug)]
pub enum ServerError {
    /// Unknown user or session
    NotFound(String),

    /// Invalid request
    InvalidRequest(String),

    /// Action not valid in the session's current state
    Conflict(String),

    /// Retriever, generation service or SMS gateway failed
    Upstream(String),

    /// Internal server error
    InternalError(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ServerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ServerError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServerError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            ServerError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServerError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ServerError::NotFound(msg)
            | ServerError::InvalidRequest(msg)
            | ServerError::Conflict(msg)
            | ServerError::Upstream(msg)
            | ServerError::InternalError(msg) => msg,
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<SdkError> for ServerError {
    fn from(err: SdkError) -> Self {
        let message = err.user_message().to_string();
        match err {
            SdkError::UserNotFound { .. } => ServerError::NotFound(message),
            SdkError::NoPendingRecommendation => ServerError::Conflict(message),
            SdkError::InvalidEvent(ref detail) => {
                warn!(error = %detail, "rejected event");
                ServerError::InvalidRequest(message)
            }
            SdkError::Retrieval(_) | SdkError::Service(_) | SdkError::Notification(_) => {
                error!(error = %err, "upstream failure");
                ServerError::Upstream(message)
            }
            SdkError::Configuration(_) | SdkError::InteractionLog(_) => {
                error!(error = %err, "internal failure");
                ServerError::InternalError(message)
            }
        }
    }
}
