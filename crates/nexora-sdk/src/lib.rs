//! Nexora SDK
//!
//! High-level API for the banking assistant: turns transaction events into
//! personalized product recommendations, answers free-form questions, and
//! runs the accept / dismiss workflow around a recommendation.
//!
//! ```rust,ignore
//! use nexora_sdk::{EngineConfig, RecommendationEngineBuilder};
//!
//! let engine = RecommendationEngineBuilder::new()
//!     .with_profiles(profiles)
//!     .with_retriever(retriever)
//!     .with_llm(llm)
//!     .with_config(EngineConfig::default())
//!     .build()?;
//!
//! let rec = engine.generate(&event).await?;
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod notification;
pub mod prompts;
pub mod retry;
pub mod session;

// Re-export main types
pub use builder::RecommendationEngineBuilder;
pub use config::{EngineConfig, LLMSettings};
pub use engine::{parse_recommendation, RecommendationEngine};
pub use error::{Result, SdkError};
pub use notification::{
    format_offer_sms, DeliveryId, MockNotifier, Notifier, NotifyError, NotifyResult,
    TwilioNotifier, TwilioSender,
};
pub use retry::{RetryError, RetryPolicy, Retryable};
pub use session::Session;

// Re-export commonly used types from dependencies
pub use nexora_core::{
    ChatMessage, ChatRole, CustomerProfile, DocumentExcerpt, InteractionAction,
    InteractionRecord, Recommendation, TransactionEvent,
};
