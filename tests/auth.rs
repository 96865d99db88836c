use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use taxinow::api::rest::router;
use taxinow::config::SimConfig;
use taxinow::state::AppState;
use taxinow::store::memory::MemoryUserStore;
use tower::ServiceExt;

fn setup() -> axum::Router {
    let state = AppState::new(
        Arc::new(MemoryUserStore::new()),
        "test-secret",
        SimConfig::default(),
        64,
    );
    router(Arc::new(state))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn bearer_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn admin_payload(email: &str) -> Value {
    json!({
        "email": email,
        "password": "s3cret-pass",
        "user_type": "admin",
        "first_name": "Ada",
        "last_name": "Admin",
        "phone": "+1 555 0100"
    })
}

fn driver_payload(email: &str) -> Value {
    json!({
        "email": email,
        "password": "driver-pass",
        "first_name": "Dora",
        "last_name": "Driver"
    })
}

async fn register_admin(app: &axum::Router, email: &str) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            admin_payload(email),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn register_admin_returns_token_and_sanitized_user() {
    let app = setup();
    let body = register_admin(&app, "admin@example.com").await;

    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "admin@example.com");
    assert_eq!(body["user"]["user_type"], "admin");
    assert!(body["user"]["password_hash"].is_null());
}

#[tokio::test]
async fn register_non_admin_type_returns_403() {
    let app = setup();
    let mut payload = admin_payload("someone@example.com");
    payload["user_type"] = json!("driver");

    let response = app
        .oneshot(json_request("POST", "/api/auth/register", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Only admin registration is allowed here.");
}

#[tokio::test]
async fn register_with_missing_fields_returns_400() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({ "email": "admin@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn register_duplicate_email_returns_409() {
    let app = setup();
    register_admin(&app, "admin@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            admin_payload("admin@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn login_with_correct_password_returns_token() {
    let app = setup();
    register_admin(&app, "admin@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "admin@example.com", "password": "s3cret-pass" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], "admin@example.com");
    assert!(body["user"]["password_hash"].is_null());
}

#[tokio::test]
async fn login_failures_share_one_error_shape() {
    let app = setup();
    register_admin(&app, "admin@example.com").await;

    let wrong_password = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "admin@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "ghost@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let first = body_json(wrong_password).await;
    let second = body_json(unknown_email).await;
    assert_eq!(first, second);
    assert_eq!(first["error"], "Invalid credentials");
}

#[tokio::test]
async fn create_driver_without_token_returns_401() {
    let app = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/create-driver",
            driver_payload("driver@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_driver_with_invalid_token_returns_403() {
    let app = setup();
    let response = app
        .oneshot(bearer_request(
            "POST",
            "/api/auth/create-driver",
            "not-a-real-token",
            driver_payload("driver@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_create_driver() {
    let app = setup();
    let admin = register_admin(&app, "admin@example.com").await;
    let token = admin["token"].as_str().unwrap();

    let response = app
        .oneshot(bearer_request(
            "POST",
            "/api/auth/create-driver",
            token,
            driver_payload("driver@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["user_type"], "driver");
    assert_eq!(body["user"]["email"], "driver@example.com");
    assert!(body["user"]["password_hash"].is_null());
    assert!(body["token"].is_null());
}

#[tokio::test]
async fn driver_token_cannot_create_drivers() {
    let app = setup();
    let admin = register_admin(&app, "admin@example.com").await;
    let admin_token = admin["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(bearer_request(
            "POST",
            "/api/auth/create-driver",
            &admin_token,
            driver_payload("driver@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "driver@example.com", "password": "driver-pass" }),
        ))
        .await
        .unwrap();
    let driver_token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(bearer_request(
            "POST",
            "/api/auth/create-driver",
            &driver_token,
            driver_payload("another@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Only admins can create drivers.");
}
