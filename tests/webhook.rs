//! Webhook dispatch integration tests

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use resumebot::api::ApiState;
use resumebot::db::{self, VisitorProfile, VisitorRepo, VisitorStore};

const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Visitor store that always fails, for the swallowed-error path
struct FailingStore;

#[async_trait::async_trait]
impl VisitorStore for FailingStore {
    async fn record_visit(&self, _profile: &VisitorProfile) -> resumebot::Result<()> {
        Err(resumebot::Error::Database("simulated outage".to_string()))
    }
}

/// Build a test router plus a repo handle sharing the same pool
fn build_test_app(secret: Option<&str>) -> (Router, VisitorRepo) {
    let pool = db::init_memory().unwrap();
    let repo = VisitorRepo::new(pool.clone());

    let state = Arc::new(ApiState {
        db: pool,
        webhook_secret: secret.map(String::from),
        visitors: Arc::new(repo.clone()),
    });

    (build_router(state), repo)
}

/// Build a test router around a failing visitor store
fn build_failing_store_app() -> Router {
    let pool = db::init_memory().unwrap();

    let state = Arc::new(ApiState {
        db: pool,
        webhook_secret: None,
        visitors: Arc::new(FailingStore),
    });

    build_router(state)
}

fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .nest("/api/webhooks", resumebot::api::webhooks::router(state.clone()))
        .merge(resumebot::api::health::router())
        .merge(resumebot::api::health::ready_router(state))
}

async fn post_update(app: Router, secret: Option<&str>, body: &str) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/telegram");

    if let Some(secret) = secret {
        request = request.header(SECRET_HEADER, secret);
    }

    let response = app
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, body.to_vec())
}

fn start_update(user_id: i64, first_name: &str) -> String {
    format!(
        r#"{{"update_id": 1, "message": {{"chat": {{"id": 100}}, "from": {{"id": {user_id}, "first_name": "{first_name}"}}, "text": "/start"}}}}"#
    )
}

#[tokio::test]
async fn test_secret_mismatch_rejected_without_store_write() {
    let (app, repo) = build_test_app(Some("expected"));

    let (status, body) = post_update(app, Some("wrong"), &start_update(42, "Ann")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, b"Unauthorized");
    assert!(repo.find("42").unwrap().is_none());
}

#[tokio::test]
async fn test_missing_secret_header_rejected() {
    let (app, repo) = build_test_app(Some("expected"));

    let (status, _) = post_update(app, None, &start_update(42, "Ann")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(repo.find("42").unwrap().is_none());
}

#[tokio::test]
async fn test_no_secret_configured_fails_open() {
    let (app, repo) = build_test_app(None);

    let (status, _) = post_update(app, None, &start_update(42, "Ann")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(repo.find("42").unwrap().unwrap().visit_count, 1);
}

#[tokio::test]
async fn test_empty_body_acknowledged() {
    let (app, repo) = build_test_app(None);

    let (status, body) = post_update(app, None, "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
    assert!(repo.find("42").unwrap().is_none());
}

#[tokio::test]
async fn test_unrecognized_update_shape_acknowledged() {
    let (app, _) = build_test_app(None);

    let (status, body) = post_update(app, None, r#"{"update_id": 1, "edited_message": {}}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_start_replies_with_welcome_and_tracks_visitor() {
    let (app, repo) = build_test_app(Some("s3cret"));

    let (status, body) = post_update(app, Some("s3cret"), &start_update(42, "Ann")).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["method"], "sendMessage");
    assert_eq!(json["chat_id"], 100);
    assert_eq!(
        json["reply_markup"]["inline_keyboard"][0][0]["web_app"]["url"],
        "https://tnvsai.github.io/resume/"
    );

    let visitor = repo.find("42").unwrap().unwrap();
    assert_eq!(visitor.first_name, "Ann");
    assert_eq!(visitor.visit_count, 1);
}

#[tokio::test]
async fn test_repeated_start_increments_visit_count() {
    let (app, repo) = build_test_app(None);

    for _ in 0..3 {
        let (status, _) = post_update(app.clone(), None, &start_update(42, "Ann")).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(repo.find("42").unwrap().unwrap().visit_count, 3);
}

#[tokio::test]
async fn test_other_text_acknowledged_without_tracking() {
    let (app, repo) = build_test_app(None);

    let body = r#"{"message": {"chat": {"id": 100}, "from": {"id": 42, "first_name": "Ann"}, "text": "hello"}}"#;
    let (status, response) = post_update(app, None, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, b"OK");
    assert!(repo.find("42").unwrap().is_none());
}

#[tokio::test]
async fn test_show_projects_callback() {
    let (app, repo) = build_test_app(None);

    let body = r#"{"callback_query": {"id": "cb1", "message": {"chat": {"id": 100}}, "data": "show_projects"}}"#;
    let (status, response) = post_update(app, None, body).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&response).unwrap();

    assert_eq!(json["method"], "sendMessage");
    assert_eq!(json["parse_mode"], "Markdown");
    assert_eq!(json["disable_web_page_preview"], true);

    let text = json["text"].as_str().unwrap();
    assert!(text.contains("CAN Bus Analyzer"));
    assert!(text.contains("RTOS Task Profiler"));
    assert!(text.contains("Sensor Fusion Node"));

    // Callback branch never touches the visitor store
    assert!(repo.find("42").unwrap().is_none());
}

#[tokio::test]
async fn test_show_contact_callback() {
    let (app, _) = build_test_app(None);

    let body = r#"{"callback_query": {"id": "cb1", "message": {"chat": {"id": 100}}, "data": "show_contact"}}"#;
    let (status, response) = post_update(app, None, body).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&response).unwrap();
    assert!(json["text"].as_str().unwrap().contains("sai@tnvsai.dev"));
}

#[tokio::test]
async fn test_unknown_callback_token_acknowledged() {
    let (app, _) = build_test_app(None);

    let body = r#"{"callback_query": {"id": "cb1", "message": {"chat": {"id": 100}}, "data": "unknown_token"}}"#;
    let (status, response) = post_update(app, None, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, b"OK");
}

#[tokio::test]
async fn test_callback_without_message_acknowledged() {
    let (app, _) = build_test_app(None);

    let body = r#"{"callback_query": {"id": "cb1", "data": "show_projects"}}"#;
    let (status, response) = post_update(app, None, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, b"OK");
}

#[tokio::test]
async fn test_message_branch_wins_when_both_fields_present() {
    let (app, _) = build_test_app(None);

    let body = r#"{
        "message": {"chat": {"id": 100}, "from": {"id": 42, "first_name": "Ann"}, "text": "/start"},
        "callback_query": {"id": "cb1", "message": {"chat": {"id": 200}}, "data": "show_projects"}
    }"#;
    let (status, response) = post_update(app, None, body).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&response).unwrap();

    // Welcome reply for chat 100, not the project list for chat 200
    assert_eq!(json["chat_id"], 100);
    assert!(json["reply_markup"].is_object());
}

#[tokio::test]
async fn test_store_failure_never_blocks_the_reply() {
    let app = build_failing_store_app();

    let (status, body) = post_update(app, None, &start_update(42, "Ann")).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["method"], "sendMessage");
    assert_eq!(json["chat_id"], 100);
    assert!(json["reply_markup"]["inline_keyboard"].is_array());
}

#[tokio::test]
async fn test_string_chat_id_round_trips() {
    let (app, _) = build_test_app(None);

    let body = r#"{"message": {"chat": {"id": "@channel"}, "from": {"id": 42, "first_name": "Ann"}, "text": "/start"}}"#;
    let (status, response) = post_update(app, None, body).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&response).unwrap();
    assert_eq!(json["chat_id"], "@channel");
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = build_test_app(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_endpoint() {
    let (app, _) = build_test_app(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["database"]["status"], "ok");
}
