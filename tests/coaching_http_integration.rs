//! Integration tests for the coaching HTTP API.
//!
//! These tests drive the full router (middleware included) with a mock
//! completion client and the in-memory transcript store:
//! 1. A coaching exchange returns the reply and records both messages
//! 2. Validation failures never reach the provider or the store
//! 3. Provider timeouts surface as the generic 500 with nothing stored
//! 4. History comes back oldest first, empty for unknown users

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use fitness_coach::adapters::http::{api_router, CoachingAppState};
use fitness_coach::adapters::{InMemoryTranscriptStore, MockCompletionClient};
use fitness_coach::config::ServerConfig;
use fitness_coach::ports::NoOpExchangeObserver;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    client: MockCompletionClient,
    store: InMemoryTranscriptStore,
}

impl TestApp {
    fn new(client: MockCompletionClient) -> Self {
        let store = InMemoryTranscriptStore::new();
        let state = CoachingAppState::new(
            Arc::new(client.clone()),
            Arc::new(store.clone()),
            Arc::new(NoOpExchangeObserver),
        );
        Self {
            router: api_router(state, &ServerConfig::default()),
            client,
            store,
        }
    }

    async fn post_coach(&self, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/ai/coach")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn get_history(&self, user_id: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(format!("/api/ai/coach/history/{}", user_id))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

fn profile() -> Value {
    json!({
        "age": 34,
        "gender": "male",
        "height_cm": 178,
        "weight_kg": 82.5,
        "goal": "fat loss",
        "activity_level": "light",
        "diet_type": "non-vegetarian",
        "medical_conditions": ["knee pain"]
    })
}

// =============================================================================
// POST /api/ai/coach
// =============================================================================

#[tokio::test]
async fn coaching_exchange_returns_reply_and_records_transcript() {
    let app = TestApp::new(MockCompletionClient::new().with_reply("💪 Today's Focus\nShort rest\n"));

    let (status, body) = app
        .post_coach(json!({"userId": "u1", "message": "hi", "userProfile": profile()}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "💪 Today's Focus\nShort rest\n"}));

    let (status, history) = app.get_history("u1").await;
    assert_eq!(status, StatusCode::OK);
    let items = history.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["role"], "user");
    assert_eq!(items[0]["content"], "hi");
    assert_eq!(items[1]["role"], "assistant");
    assert_eq!(items[1]["content"], "💪 Today's Focus\nShort rest\n");
}

#[tokio::test]
async fn system_prompt_carries_profile_and_language() {
    let app = TestApp::new(MockCompletionClient::new().with_reply("ok"));

    app.post_coach(json!({
        "userId": "u1",
        "message": "enna romba valikuthu",
        "userProfile": profile()
    }))
    .await;

    let calls = app.client.get_calls();
    assert_eq!(calls.len(), 1);
    let prompt = &calls[0].system_prompt;
    assert!(prompt.contains("You MUST reply ONLY in this language: TA."));
    assert!(prompt.contains("Weight: 82.5 kg"));
    assert!(prompt.contains("Medical Conditions:\nknee pain"));
}

#[tokio::test]
async fn missing_user_id_is_rejected_without_side_effects() {
    let app = TestApp::new(MockCompletionClient::new());

    let (status, body) = app
        .post_coach(json!({"message": "hi", "userProfile": profile()}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing userId"}));
    assert_eq!(app.client.call_count(), 0);
    assert_eq!(app.store.record_count().await, 0);
}

#[tokio::test]
async fn missing_message_is_rejected() {
    let app = TestApp::new(MockCompletionClient::new());

    let (status, body) = app
        .post_coach(json!({"userId": "u1", "userProfile": profile()}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing message or userProfile"}));
}

#[tokio::test]
async fn provider_timeout_is_generic_and_stores_nothing() {
    let app = TestApp::new(
        MockCompletionClient::new()
            .with_reply("too late")
            .with_delay(Duration::from_secs(5))
            .with_timeout(Duration::from_millis(50)),
    );

    let (status, body) = app
        .post_coach(json!({"userId": "u1", "message": "hi", "userProfile": profile()}))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "AI Coach unavailable"}));
    assert_eq!(app.store.record_count().await, 0);
}

#[tokio::test]
async fn store_outage_still_delivers_reply() {
    let app = TestApp::new(MockCompletionClient::new().with_reply("drink water"));
    app.store.set_unavailable(true);

    let (status, body) = app
        .post_coach(json!({"userId": "u1", "message": "hi", "userProfile": profile()}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "drink water");
}

// =============================================================================
// GET /api/ai/coach/history/:userId
// =============================================================================

#[tokio::test]
async fn history_after_three_exchanges_is_six_ascending_records() {
    let app = TestApp::new(
        MockCompletionClient::new()
            .with_reply("r1")
            .with_reply("r2")
            .with_reply("r3"),
    );

    for message in ["m1", "m2", "m3"] {
        let (status, _) = app
            .post_coach(json!({"userId": "u1", "message": message, "userProfile": profile()}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, history) = app.get_history("u1").await;
    assert_eq!(status, StatusCode::OK);

    let items = history.as_array().unwrap();
    let contents: Vec<_> = items.iter().map(|i| i["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["m1", "r1", "m2", "r2", "m3", "r3"]);

    let stamps: Vec<_> = items
        .iter()
        .map(|i| {
            chrono::DateTime::parse_from_rfc3339(i["createdAt"].as_str().unwrap()).unwrap()
        })
        .collect();
    for pair in stamps.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
    assert!(items.iter().all(|i| i["userId"] == "u1"));
}

#[tokio::test]
async fn history_for_unknown_user_is_empty() {
    let app = TestApp::new(MockCompletionClient::new());

    let (status, body) = app.get_history("never-seen").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn history_is_isolated_per_user() {
    let app = TestApp::new(MockCompletionClient::new().with_reply("a").with_reply("b"));

    app.post_coach(json!({"userId": "alice", "message": "hi", "userProfile": {}}))
        .await;
    app.post_coach(json!({"userId": "bob", "message": "hello", "userProfile": {}}))
        .await;

    let (_, alice) = app.get_history("alice").await;
    let items = alice.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i["userId"] == "alice"));
}
