//! REST API implementation
//!
//! - types: Request/response type definitions and shared state
//! - extractors: JSON extractor with structured 400 responses
//! - handlers: API endpoint handlers
//! - router: Router creation and configuration
//! - tests: Unit tests for the payload types

mod extractors;
mod handlers;
mod router;
pub mod types;

// Re-export public API
pub use extractors::JsonExtractor;
pub use router::create_router;
pub use types::{
    AcceptResponse, AppState, ChatPayload, ChatResponse, CreateSessionPayload, DismissResponse,
    HealthResponse, HistoryResponse, InteractionsResponse, ProfileSummary, RecommendPayload,
    RecommendationResponse, SessionMap, SessionResponse,
};
