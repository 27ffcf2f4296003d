//! Router creation and configuration

use super::handlers::*;
use super::types::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use nexora_sdk::RecommendationEngine;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create REST API router
pub fn create_router(engine: Arc<RecommendationEngine>) -> Router {
    let state = AppState::new(engine);

    Router::new()
        .route("/health", get(health))
        .route("/v1/profiles", get(list_profiles))
        .route("/v1/recommendations", post(recommend_event))
        .route("/v1/interactions", get(interactions))
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/:id", delete(close_session))
        .route("/v1/sessions/:id/recommendations", post(recommend))
        .route("/v1/sessions/:id/accept", post(accept))
        .route("/v1/sessions/:id/dismiss", post(dismiss))
        .route("/v1/sessions/:id/chat", post(chat).get(history))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
