//! Notification dispatch (SMS)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

mod mock;
mod twilio;

pub use mock::MockNotifier;
pub use twilio::{TwilioNotifier, TwilioSender};

/// Identifier assigned by the delivery service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(pub String);

impl DeliveryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Notification errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notifier not configured: {0}")]
    Configuration(String),

    /// The gateway rejected the message
    #[error("Delivery API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never reached the gateway; nothing was sent
    #[error("Delivery request not sent: {0}")]
    Unsent(String),

    /// The request failed after it may have reached the gateway
    #[error("Delivery request failed: {0}")]
    Transport(String),

    #[error("Invalid delivery response: {0}")]
    InvalidResponse(String),
}

impl NotifyError {
    /// Transient only when the message certainly did not go out: the
    /// connection failed, or the gateway answered 429 or 5xx
    pub fn is_retryable(&self) -> bool {
        match self {
            NotifyError::Unsent(_) => true,
            NotifyError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type for notification operations
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

/// Sends a text message to a destination (phone number)
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, body: &str, destination: &str) -> NotifyResult<DeliveryId>;
}

/// SMS body for an accepted offer
pub fn format_offer_sms(product_name: &str) -> String {
    format!("\"Bank Offer\" : {}", product_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_sms_format() {
        assert_eq!(
            format_offer_sms("Platinum Travel Card"),
            "\"Bank Offer\" : Platinum Travel Card"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(NotifyError::Unsent("connection refused".into()).is_retryable());
        assert!(!NotifyError::Transport("reset".into()).is_retryable());
        assert!(!NotifyError::InvalidResponse("no sid".into()).is_retryable());
        assert!(NotifyError::Api { status: 500, message: String::new() }.is_retryable());
        assert!(!NotifyError::Api { status: 400, message: String::new() }.is_retryable());
        assert!(!NotifyError::Configuration("no sid".into()).is_retryable());
    }
}
