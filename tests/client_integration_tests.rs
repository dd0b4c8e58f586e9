use std::sync::{Arc, Mutex};
use std::time::Duration;

use promptpilot::client::{
    AuthError, Credentials, HealthChecker, HealthPolicy, HealthStatus, HttpImprovementClient,
    ImproveError, ImproveRequest, ImprovementClient, auth,
};
use promptpilot::core::intent::Intent;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

const IMPROVE_PATH: &str = "/api/improve-prompt";

fn client_for(server: &MockServer, token: Option<&str>) -> HttpImprovementClient {
    HttpImprovementClient::new(
        &server.uri(),
        IMPROVE_PATH,
        token.map(str::to_string),
        Duration::from_secs(5),
    )
}

fn request(prompt: &str, intent: Option<Intent>) -> ImproveRequest {
    ImproveRequest {
        prompt: prompt.to_string(),
        intent,
    }
}

/// Short timings so retry tests run in milliseconds.
fn fast_policy() -> HealthPolicy {
    HealthPolicy {
        retry_interval: Duration::from_millis(10),
        settle_delay: Duration::from_millis(5),
    }
}

// ============================================================================
// Improvement Client Tests
// ============================================================================

#[tokio::test]
async fn test_improve_success_returns_improved_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(IMPROVE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "improved_prompt": "Write a haiku about autumn leaves." })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let result = client
        .improve(&request("write a poem", Some(Intent::None)))
        .await;

    let improved = assert_ok!(result);
    assert_eq!(improved.improved_text, "Write a haiku about autumn leaves.");
}

#[tokio::test]
async fn test_improve_sends_detected_intent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(IMPROVE_PATH))
        .and(body_json(json!({ "prompt": "a lighthouse", "intent": "image_generation" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "improved_prompt": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let result = client
        .improve(&request("a lighthouse", Some(Intent::ImageGeneration)))
        .await;
    assert_ok!(result);
}

#[tokio::test]
async fn test_improve_omits_absent_intent() {
    let mock_server = MockServer::start().await;

    // Exact body match: no "intent" key at all
    Mock::given(method("POST"))
        .and(path(IMPROVE_PATH))
        .and(body_json(json!({ "prompt": "edited prompt text" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "improved_prompt": "ok" })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    assert_ok!(client.improve(&request("edited prompt text", None)).await);
    assert_ok!(
        client
            .improve(&request("edited prompt text", Some(Intent::None)))
            .await
    );
}

#[tokio::test]
async fn test_improve_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(IMPROVE_PATH))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "improved_prompt": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Some("secret-token"));
    assert_ok!(client.improve(&request("some prompt here", None)).await);
}

#[tokio::test]
async fn test_improve_bad_request_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(IMPROVE_PATH))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let err = assert_err!(client.improve(&request("hi", Some(Intent::None))).await);
    assert_eq!(err, ImproveError::Validation { message: None });
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn test_improve_bad_request_with_error_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(IMPROVE_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Prompt must not be empty" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let err = assert_err!(client.improve(&request("x", None)).await);
    assert_eq!(err.server_message(), Some("Prompt must not be empty"));
}

#[tokio::test]
async fn test_improve_server_error_keeps_status_and_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(IMPROVE_PATH))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Model overloaded" })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let err = assert_err!(client.improve(&request("some prompt here", None)).await);
    assert_eq!(
        err,
        ImproveError::Server {
            status: 500,
            message: Some("Model overloaded".into())
        }
    );
}

#[tokio::test]
async fn test_improve_malformed_success_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(IMPROVE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, None);
    let err = assert_err!(client.improve(&request("some prompt here", None)).await);
    assert!(matches!(err, ImproveError::Parse(_)));
}

#[tokio::test]
async fn test_improve_unreachable_backend_is_transport_error() {
    // Nothing listens on port 1
    let client = HttpImprovementClient::new(
        "http://127.0.0.1:1",
        IMPROVE_PATH,
        None,
        Duration::from_secs(2),
    );
    let err = assert_err!(client.improve(&request("some prompt here", None)).await);
    assert!(matches!(err, ImproveError::Transport(_)));
    assert_eq!(err.server_message(), None);
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_ready_on_first_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let checker = HealthChecker::new(&mock_server.uri(), "/api/health", fast_policy());
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let seen = statuses.clone();
    let attempts = checker
        .wait_until_ready(move |status| seen.lock().unwrap().push(status))
        .await;

    assert_eq!(attempts, 1);
    assert_eq!(
        *statuses.lock().unwrap(),
        vec![HealthStatus::Checking, HealthStatus::Ready]
    );
}

#[tokio::test]
async fn test_health_retries_until_backend_is_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let checker = HealthChecker::new(&mock_server.uri(), "/api/health", fast_policy());
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let seen = statuses.clone();
    let attempts = checker
        .wait_until_ready(move |status| seen.lock().unwrap().push(status))
        .await;

    assert_eq!(attempts, 3);
    assert_eq!(
        *statuses.lock().unwrap(),
        vec![
            HealthStatus::Checking,
            HealthStatus::Retrying { failed_attempts: 1 },
            HealthStatus::Retrying { failed_attempts: 2 },
            HealthStatus::Ready,
        ]
    );
}

#[tokio::test]
async fn test_health_probe_false_for_unreachable_backend() {
    let checker = HealthChecker::new("http://127.0.0.1:1", "/api/health", fast_policy());
    assert!(!checker.probe().await);
}

// ============================================================================
// Signup Tests
// ============================================================================

fn credentials() -> Credentials {
    Credentials {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        password: "hunter22".into(),
    }
}

#[tokio::test]
async fn test_signup_returns_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(auth::SIGNUP_PATH))
        .and(body_json(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "token": "abc123" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let token = assert_ok!(auth::signup(&mock_server.uri(), &credentials()).await);
    assert_eq!(token, "abc123");
}

#[tokio::test]
async fn test_signup_rejection_uses_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(auth::SIGNUP_PATH))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Email already registered" })),
        )
        .mount(&mock_server)
        .await;

    let err = assert_err!(auth::signup(&mock_server.uri(), &credentials()).await);
    assert_eq!(err.user_message(), "Email already registered");
}

#[tokio::test]
async fn test_signup_rejection_without_message_falls_back() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(auth::SIGNUP_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = assert_err!(auth::signup(&mock_server.uri(), &credentials()).await);
    assert!(matches!(err, AuthError::Rejected { status: 500, .. }));
    assert_eq!(err.user_message(), "Signup failed");
}
