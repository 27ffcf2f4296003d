//! REST API type definitions
//!
//! Request and response types for the REST API endpoints.

use nexora_sdk::{
    ChatMessage, CustomerProfile, DeliveryId, InteractionRecord, Recommendation,
    RecommendationEngine, Session, TransactionEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Live sessions by id
///
/// The outer lock is only held to look a session up; each session has its
/// own lock for the duration of a request.
pub type SessionMap = Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub sessions: SessionMap,
}

impl AppState {
    pub fn new(engine: Arc<RecommendationEngine>) -> Self {
        Self {
            engine,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Profile listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub user_id: String,
    pub requirement: String,
    pub risk_tolerance: String,
    pub financial_goal: String,
}

impl From<&CustomerProfile> for ProfileSummary {
    fn from(profile: &CustomerProfile) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            requirement: profile.risk_profiling.requirement.clone(),
            risk_tolerance: profile.risk_tolerance().to_string(),
            financial_goal: profile.financial_goal().to_string(),
        }
    }
}

/// Open a session
#[derive(Debug, Deserialize)]
pub struct CreateSessionPayload {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub user_id: String,
}

/// Transaction details for a session recommendation
///
/// The user comes from the session, so only the transaction is sent.
#[derive(Debug, Deserialize)]
pub struct RecommendPayload {
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
}

impl RecommendPayload {
    pub fn into_event(self, user_id: &str) -> TransactionEvent {
        let mut event = TransactionEvent::new(user_id, self.amount, self.description);
        if let Some(currency) = self.currency {
            event = event.with_currency(currency);
        }
        if let Some(transaction_type) = self.transaction_type {
            event = event.with_transaction_type(transaction_type);
        }
        event
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub recommendation: Recommendation,

    /// True when the generator's output could not be parsed
    pub fallback: bool,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            fallback: recommendation.is_fallback(),
            recommendation,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptResponse {
    pub delivery_id: DeliveryId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DismissResponse {
    pub dismissed: Recommendation,
}

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub user_id: String,
    pub pending: Option<Recommendation>,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InteractionsResponse {
    pub interactions: Vec<InteractionRecord>,
}
