//! Transaction event definitions
//!
//! Events arrive either flat:
//!
//! ```json
//! { "user_id": "USR_001", "amount": 250.0, "description": "International Flight Ticket" }
//! ```
//!
//! or in the streaming-bus envelope, with the payload nested under `data`:
//!
//! ```json
//! { "user_id": "USR_001", "event_source": "STREAMING_BUS",
//!   "data": { "type": "E-COMMERCE", "amount": 250.0, "currency": "USD",
//!             "description": "Purchase at Apple" } }
//! ```

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "USD".to_string()
}

/// Transaction event, one per recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EventWire")]
pub struct TransactionEvent {
    /// Foreign key into the profile store
    pub user_id: String,

    /// Transaction amount (non-negative)
    pub amount: f64,

    /// Free-text description, used as the retrieval query
    pub description: String,

    /// ISO currency code
    pub currency: String,

    /// Transaction category (E-COMMERCE, BANK_TRANSFER, POS_PURCHASE, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,

    /// Event timestamp as sent by the producer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TransactionEvent {
    /// Create a new event in USD
    pub fn new(user_id: impl Into<String>, amount: f64, description: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            description: description.into(),
            currency: default_currency(),
            transaction_type: None,
            timestamp: None,
        }
    }

    /// Set the currency
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the transaction type
    pub fn with_transaction_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Reject events the pipeline cannot use
    pub fn validate(&self) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(CoreError::InvalidEvent("user_id is empty".to_string()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(CoreError::InvalidEvent(format!(
                "amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventWire {
    Enveloped {
        user_id: String,
        data: EventPayload,
        #[serde(default)]
        timestamp: Option<String>,
    },
    Flat {
        user_id: String,
        #[serde(flatten)]
        payload: EventPayload,
        #[serde(default)]
        timestamp: Option<String>,
    },
}

#[derive(Deserialize)]
struct EventPayload {
    amount: f64,
    description: String,
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default, rename = "type", alias = "transaction_type")]
    transaction_type: Option<String>,
}

impl From<EventWire> for TransactionEvent {
    fn from(wire: EventWire) -> Self {
        let (user_id, payload, timestamp) = match wire {
            EventWire::Enveloped {
                user_id,
                data,
                timestamp,
            } => (user_id, data, timestamp),
            EventWire::Flat {
                user_id,
                payload,
                timestamp,
            } => (user_id, payload, timestamp),
        };

        TransactionEvent {
            user_id,
            amount: payload.amount,
            description: payload.description,
            currency: payload.currency,
            transaction_type: payload.transaction_type,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = TransactionEvent::new("USR_001", 250.0, "International Flight Ticket")
            .with_transaction_type("E-COMMERCE")
            .with_currency("EUR");

        assert_eq!(event.user_id, "USR_001");
        assert_eq!(event.amount, 250.0);
        assert_eq!(event.currency, "EUR");
        assert_eq!(event.transaction_type.as_deref(), Some("E-COMMERCE"));
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_deserialize_flat_event() {
        let json = r#"{"user_id": "USR_001", "amount": 5000.0, "description": "Investment into Tech Stocks"}"#;
        let event: TransactionEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.user_id, "USR_001");
        assert_eq!(event.amount, 5000.0);
        assert_eq!(event.description, "Investment into Tech Stocks");
        assert_eq!(event.currency, "USD");
        assert!(event.transaction_type.is_none());
    }

    #[test]
    fn test_deserialize_enveloped_event() {
        let json = r#"{
            "timestamp": "2024-05-01T10:00:00",
            "user_id": "USR_003",
            "event_source": "STREAMING_BUS",
            "data": {
                "type": "BANK_TRANSFER",
                "amount": 1800.5,
                "currency": "USD",
                "description": "Salary Credit / Monthly Deposit",
                "potential_interest_flag": true
            }
        }"#;
        let event: TransactionEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.user_id, "USR_003");
        assert_eq!(event.amount, 1800.5);
        assert_eq!(event.transaction_type.as_deref(), Some("BANK_TRANSFER"));
        assert_eq!(event.timestamp.as_deref(), Some("2024-05-01T10:00:00"));
    }

    #[test]
    fn test_validate_negative_amount() {
        let event = TransactionEvent::new("USR_001", -1.0, "Refund");
        assert!(matches!(event.validate(), Err(CoreError::InvalidEvent(_))));
    }

    #[test]
    fn test_validate_nan_amount() {
        let event = TransactionEvent::new("USR_001", f64::NAN, "Broken");
        assert!(event.validate().is_err());
    }

    #[test]
    fn test_validate_empty_user() {
        let event = TransactionEvent::new("", 10.0, "Coffee");
        assert!(event.validate().is_err());
    }
}
