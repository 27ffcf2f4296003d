//! API endpoint handlers

use super::extractors::JsonExtractor;
use super::types::*;
use crate::error::ServerError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use nexora_sdk::{Session, TransactionEvent};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Health check endpoint
pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Known customer profiles
pub(super) async fn list_profiles(State(state): State<AppState>) -> Json<Vec<ProfileSummary>> {
    Json(
        state
            .engine
            .profiles()
            .into_iter()
            .map(ProfileSummary::from)
            .collect(),
    )
}

/// Stateless recommendation for a full transaction event
#[axum::debug_handler]
pub(super) async fn recommend_event(
    State(state): State<AppState>,
    JsonExtractor(event): JsonExtractor<TransactionEvent>,
) -> Result<Json<RecommendationResponse>, ServerError> {
    info!("Received event for {} ({})", event.user_id, event.description);

    let recommendation = state.engine.generate(&event).await?;
    Ok(Json(recommendation.into()))
}

/// Open a session for a known user
pub(super) async fn create_session(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<CreateSessionPayload>,
) -> Result<(StatusCode, Json<SessionResponse>), ServerError> {
    let session = state.engine.start_session(&payload.user_id)?;
    let session_id = Uuid::new_v4();

    state
        .sessions
        .write()
        .await
        .insert(session_id, Arc::new(Mutex::new(session)));
    info!("Opened session {} for {}", session_id, payload.user_id);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            user_id: payload.user_id,
        }),
    ))
}

/// Close a session
pub(super) async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .sessions
        .write()
        .await
        .remove(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    info!("Closed session {}", session_id);

    Ok(StatusCode::NO_CONTENT)
}

/// Generate a recommendation and hold it in the session
#[axum::debug_handler]
pub(super) async fn recommend(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    JsonExtractor(payload): JsonExtractor<RecommendPayload>,
) -> Result<Json<RecommendationResponse>, ServerError> {
    let session = find_session(&state, session_id).await?;
    let mut session = session.lock().await;

    let event = payload.into_event(session.user_id());
    let recommendation = state.engine.recommend(&mut session, &event).await?;
    Ok(Json(recommendation.into()))
}

/// Accept the pending recommendation and send the SMS
pub(super) async fn accept(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AcceptResponse>, ServerError> {
    let session = find_session(&state, session_id).await?;
    let mut session = session.lock().await;

    let delivery_id = state.engine.accept(&mut session).await?;
    Ok(Json(AcceptResponse { delivery_id }))
}

/// Dismiss the pending recommendation
pub(super) async fn dismiss(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<DismissResponse>, ServerError> {
    let session = find_session(&state, session_id).await?;
    let mut session = session.lock().await;

    let dismissed = state.engine.dismiss(&mut session).await?;
    Ok(Json(DismissResponse { dismissed }))
}

/// Ask a question within the session
#[axum::debug_handler]
pub(super) async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    JsonExtractor(payload): JsonExtractor<ChatPayload>,
) -> Result<Json<ChatResponse>, ServerError> {
    if payload.message.trim().is_empty() {
        return Err(ServerError::InvalidRequest("message is empty".to_string()));
    }

    let session = find_session(&state, session_id).await?;
    let mut session = session.lock().await;

    let reply = state.engine.ask(&mut session, &payload.message).await?;
    Ok(Json(ChatResponse { reply }))
}

/// Session state: pending recommendation and chat history
pub(super) async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ServerError> {
    let session = find_session(&state, session_id).await?;
    let session = session.lock().await;

    Ok(Json(HistoryResponse {
        user_id: session.user_id().to_string(),
        pending: session.pending().cloned(),
        messages: session.history().to_vec(),
    }))
}

/// Interaction log, oldest first
pub(super) async fn interactions(
    State(state): State<AppState>,
) -> Result<Json<InteractionsResponse>, ServerError> {
    let interactions = state.engine.interactions().await?;
    Ok(Json(InteractionsResponse { interactions }))
}

async fn find_session(
    state: &AppState,
    session_id: Uuid,
) -> Result<Arc<Mutex<Session>>, ServerError> {
    state
        .sessions
        .read()
        .await
        .get(&session_id)
        .cloned()
        .ok_or_else(|| session_not_found(session_id))
}

fn session_not_found(session_id: Uuid) -> ServerError {
    ServerError::NotFound(format!("session {} not found", session_id))
}
