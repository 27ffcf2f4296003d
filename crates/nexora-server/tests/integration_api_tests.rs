//! Integration tests for REST API endpoints
//!
//! These tests build a real RecommendationEngine over in-process
//! collaborators and drive the router end-to-end.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use nexora_core::{CustomerProfile, DocumentExcerpt};
use nexora_llm::{LLMClient, MockProvider};
use nexora_repository::{InMemoryInteractionLog, ProfileStore};
use nexora_retrieval::{KnowledgeRetriever, RetrievalResult};
use nexora_sdk::{EngineConfig, MockNotifier, RecommendationEngineBuilder, RetryPolicy};
use nexora_server::api::create_router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const OFFER_JSON: &str = r#"```json
{"product_name": "Platinum Travel Card", "recommendation": "Earn 3x miles on flights and pay no foreign transaction fees."}
```"#;

struct StaticRetriever;

#[async_trait]
impl KnowledgeRetriever for StaticRetriever {
    async fn search(&self, _query: &str, k: usize) -> RetrievalResult<Vec<DocumentExcerpt>> {
        Ok(vec![
            DocumentExcerpt::new("Platinum Travel Card: 3x miles, no FX fees."),
            DocumentExcerpt::new("Gold Savings Account: 4.1% APY."),
        ]
        .into_iter()
        .take(k)
        .collect())
    }
}

fn create_test_app(llm: MockProvider, notifier: Arc<MockNotifier>) -> Router {
    let profiles = ProfileStore::from_profiles(vec![
        CustomerProfile::new("USR_001", 5200.0, "Low", "Conservative saver", "Buy a house"),
        CustomerProfile::new("USR_002", 8000.0, "High", "Growth investor", "Early retirement"),
    ])
    .unwrap();

    let engine = RecommendationEngineBuilder::new()
        .with_profiles(Arc::new(profiles))
        .with_retriever(Arc::new(StaticRetriever))
        .with_llm(Arc::new(llm) as Arc<dyn LLMClient>)
        .with_notifier(notifier)
        .with_interaction_log(Arc::new(InMemoryInteractionLog::new()))
        .with_config(
            EngineConfig::default()
                .with_retry(RetryPolicy::no_retry())
                .with_sms_destination("+15551234567"),
        )
        .build()
        .unwrap();

    create_router(Arc::new(engine))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn open_session(app: &Router, user_id: &str) -> String {
    let (status, body) = send(app, "POST", "/v1/sessions", Some(json!({"user_id": user_id}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(MockProvider::new(), Arc::new(MockNotifier::new()));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_list_profiles() {
    let app = create_test_app(MockProvider::new(), Arc::new(MockNotifier::new()));

    let (status, body) = send(&app, "GET", "/v1/profiles", None).await;
    assert_eq!(status, StatusCode::OK);
    let profiles = body.as_array().unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0]["user_id"], "USR_001");
    assert_eq!(profiles[1]["risk_tolerance"], "High");
}

#[tokio::test]
async fn test_stateless_recommendation() {
    let app = create_test_app(
        MockProvider::with_response(OFFER_JSON),
        Arc::new(MockNotifier::new()),
    );

    let (status, body) = send(
        &app,
        "POST",
        "/v1/recommendations",
        Some(json!({
            "user_id": "USR_002",
            "event_source": "STREAMING_BUS",
            "data": {"type": "E-COMMERCE", "amount": 250.0, "currency": "USD",
                     "description": "International Flight Ticket"}
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product_name"], "Platinum Travel Card");
    assert_eq!(body["fallback"], false);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let llm = MockProvider::with_response(OFFER_JSON);
    let app = create_test_app(llm, Arc::new(MockNotifier::new()));

    let (status, body) = send(
        &app,
        "POST",
        "/v1/recommendations",
        Some(json!({"user_id": "USR_999", "amount": 10.0, "description": "Coffee"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);

    let (status, _) = send(&app, "POST", "/v1/sessions", Some(json!({"user_id": "USR_999"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_negative_amount_is_bad_request() {
    let app = create_test_app(MockProvider::new(), Arc::new(MockNotifier::new()));

    let (status, body) = send(
        &app,
        "POST",
        "/v1/recommendations",
        Some(json!({"user_id": "USR_001", "amount": -5.0, "description": "Refund"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The transaction event is invalid.");
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let app = create_test_app(MockProvider::new(), Arc::new(MockNotifier::new()));

    let request = Request::builder()
        .method("POST")
        .uri("/v1/sessions")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("JSON syntax error"));
}

#[tokio::test]
async fn test_recommend_then_accept() {
    let notifier = Arc::new(MockNotifier::new());
    let app = create_test_app(MockProvider::with_response(OFFER_JSON), notifier.clone());
    let session_id = open_session(&app, "USR_002").await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/recommendations", session_id),
        Some(json!({"amount": 250.0, "description": "International Flight Ticket"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product_name"], "Platinum Travel Card");

    let (status, body) = send(&app, "POST", &format!("/v1/sessions/{}/accept", session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["delivery_id"].as_str().unwrap().starts_with("SM_MOCK_"));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+15551234567");
    assert_eq!(sent[0].1, "\"Bank Offer\" : Platinum Travel Card");

    let (status, body) = send(&app, "GET", "/v1/interactions", None).await;
    assert_eq!(status, StatusCode::OK);
    let interactions = body["interactions"].as_array().unwrap();
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0]["user_id"], "USR_002");
    assert_eq!(interactions[0]["action"], "ACCEPTED");

    // Nothing pending after a successful accept
    let (status, _) = send(&app, "POST", &format!("/v1/sessions/{}/accept", session_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_accept_without_pending_is_conflict() {
    let notifier = Arc::new(MockNotifier::new());
    let app = create_test_app(MockProvider::new(), notifier.clone());
    let session_id = open_session(&app, "USR_001").await;

    let (status, body) = send(&app, "POST", &format!("/v1/sessions/{}/accept", session_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
    assert_eq!(notifier.attempts(), 0);
}

#[tokio::test]
async fn test_dismiss_clears_pending() {
    let app = create_test_app(
        MockProvider::with_response(OFFER_JSON),
        Arc::new(MockNotifier::new()),
    );
    let session_id = open_session(&app, "USR_002").await;

    send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/recommendations", session_id),
        Some(json!({"amount": 250.0, "description": "International Flight Ticket"})),
    )
    .await;

    let (status, body) = send(&app, "POST", &format!("/v1/sessions/{}/dismiss", session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dismissed"]["product_name"], "Platinum Travel Card");

    let (_, body) = send(&app, "GET", &format!("/v1/sessions/{}/chat", session_id), None).await;
    assert!(body["pending"].is_null());

    let (_, body) = send(&app, "GET", "/v1/interactions", None).await;
    assert_eq!(body["interactions"][0]["action"], "DISMISSED");
}

#[tokio::test]
async fn test_upstream_error_text_is_not_leaked() {
    let llm = MockProvider::new().then_fail(403, "API key AIza-test-secret was revoked");
    let app = create_test_app(llm, Arc::new(MockNotifier::new()));

    let (status, body) = send(
        &app,
        "POST",
        "/v1/recommendations",
        Some(json!({"user_id": "USR_001", "amount": 10.0, "description": "Coffee"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body.to_string().contains("AIza-test-secret"));
    assert_eq!(
        body["error"],
        "The recommendation service is temporarily unavailable."
    );
}

#[tokio::test]
async fn test_chat_keeps_history() {
    let llm = MockProvider::new()
        .then_reply("The Gold Savings Account pays 4.1% APY.")
        .then_reply("Yes, there is no minimum balance.");
    let app = create_test_app(llm, Arc::new(MockNotifier::new()));
    let session_id = open_session(&app, "USR_001").await;
    let uri = format!("/v1/sessions/{}/chat", session_id);

    let (status, body) = send(&app, "POST", &uri, Some(json!({"message": "Best savings account?"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "The Gold Savings Account pays 4.1% APY.");

    send(&app, "POST", &uri, Some(json!({"message": "Any minimum balance?"}))).await;

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Best savings account?");
    assert_eq!(messages[3]["content"], "Yes, there is no minimum balance.");
}

#[tokio::test]
async fn test_empty_chat_message_is_bad_request() {
    let app = create_test_app(MockProvider::new(), Arc::new(MockNotifier::new()));
    let session_id = open_session(&app, "USR_001").await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/v1/sessions/{}/chat", session_id),
        Some(json!({"message": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = create_test_app(MockProvider::new(), Arc::new(MockNotifier::new()));
    let missing = uuid::Uuid::new_v4();

    let (status, body) = send(&app, "POST", &format!("/v1/sessions/{}/accept", missing), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_close_session() {
    let app = create_test_app(MockProvider::new(), Arc::new(MockNotifier::new()));
    let session_id = open_session(&app, "USR_001").await;

    let (status, _) = send(&app, "DELETE", &format!("/v1/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/v1/sessions/{}/chat", session_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
