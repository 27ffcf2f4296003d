//! Nexora Core - Value types shared across the Nexora workspace
//!
//! This crate provides the plain data types that flow through the
//! recommendation pipeline:
//! - Customer profiles (loaded once, read-only)
//! - Transaction events (one per recommendation request)
//! - Document excerpts returned by the knowledge retriever
//! - Recommendations produced by the generator
//! - Interaction records and chat messages for the surrounding shell
//!
//! Nothing in here performs I/O.

pub mod chat;
pub mod error;
pub mod event;
pub mod excerpt;
pub mod interaction;
pub mod profile;
pub mod recommendation;

// Re-export commonly used types
pub use chat::{ChatMessage, ChatRole};
pub use error::{CoreError, Result};
pub use event::TransactionEvent;
pub use excerpt::{join_excerpts, DocumentExcerpt};
pub use interaction::{InteractionAction, InteractionRecord};
pub use profile::{CustomerProfile, HistoricData, Questionnaire, RiskProfiling};
pub use recommendation::{Recommendation, FALLBACK_PRODUCT_NAME};
