use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tripnote_server::auth::TokenIssuer;
use tripnote_server::routes::create_router;
use tripnote_server::test_support::{fixed_clock, test_secret, test_state, MutableClock};

async fn test_app() -> (Router, Arc<MutableClock>) {
    let clock = fixed_clock();
    let state = test_state(clock.clone()).await;
    (create_router(state), clock)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    authorization: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, username: &str, password: &str) -> StatusCode {
    let body = json!({ "username": username, "fullname": "Test User", "password": password });
    send(app, Method::POST, "/register", Some(body), None).await.0
}

async fn login_token(app: &Router, username: &str, password: &str) -> String {
    let body = json!({ "username": username, "password": password });
    let (status, value) = send(app, Method::POST, "/login", Some(body), None).await;
    assert_eq!(status, StatusCode::OK);
    value["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_success() {
    let (app, _) = test_app().await;

    let body = json!({ "username": "alice", "fullname": "Alice Liddell", "password": "wonderland" });
    let (status, value) = send(&app, Method::POST, "/register", Some(body), None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["message"], "User registered successfully");
}

#[tokio::test]
async fn test_register_missing_fields() {
    let (app, _) = test_app().await;

    let body = json!({ "username": "alice", "password": "wonderland" });
    let (status, value) = send(&app, Method::POST, "/register", Some(body), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["message"], "username, fullname, and password are required");
}

#[tokio::test]
async fn test_register_invalid_json() {
    let (app, _) = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (app, _) = test_app().await;

    assert_eq!(register(&app, "alice", "first").await, StatusCode::CREATED);

    let body = json!({ "username": "alice", "fullname": "Someone Else", "password": "second" });
    let (status, value) = send(&app, Method::POST, "/register", Some(body), None).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(value["message"], "Username is already taken");
}

#[tokio::test]
async fn test_login_success_returns_token() {
    let (app, _) = test_app().await;
    register(&app, "alice", "wonderland").await;

    let body = json!({ "username": "alice", "password": "wonderland" });
    let (status, value) = send(&app, Method::POST, "/login", Some(body), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["message"], "Login successful");
    assert_eq!(value["token"].as_str().unwrap().split('.').count(), 3);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (app, _) = test_app().await;
    register(&app, "alice", "wonderland").await;

    let wrong_password = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "username": "alice", "password": "looking-glass" })),
        None,
    )
    .await;
    let unknown_user = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "username": "mallory", "password": "wonderland" })),
        None,
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let (app, _) = test_app().await;

    let (status, value) = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({ "username": "alice" })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["message"], "Username and password are required");
}

#[tokio::test]
async fn test_profile_with_valid_token() {
    let (app, _) = test_app().await;
    register(&app, "alice", "wonderland").await;
    let token = login_token(&app, "alice", "wonderland").await;

    let (status, value) = send(
        &app,
        Method::GET,
        "/profile",
        None,
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["user"]["username"], "alice");
    assert_eq!(value["user"]["fullname"], "Test User");
    assert!(value["user"].get("password_hash").is_none());
    assert!(!value.to_string().contains("$2b$"));
}

#[tokio::test]
async fn test_profile_without_token() {
    let (app, _) = test_app().await;

    let (status, value) = send(&app, Method::GET, "/profile", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(value["message"], "Authentication required");
}

#[tokio::test]
async fn test_profile_with_malformed_header() {
    let (app, _) = test_app().await;
    register(&app, "alice", "wonderland").await;
    let token = login_token(&app, "alice", "wonderland").await;

    for header_value in [
        token.clone(),
        format!("Basic {token}"),
        "Bearer".to_string(),
        "Bearer ".to_string(),
        "Basic YWxpY2U6d29uZGVybGFuZA==".to_string(),
    ] {
        let (status, _) = send(&app, Method::GET, "/profile", None, Some(&header_value)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header: {header_value:?}");
    }
}

#[tokio::test]
async fn test_profile_with_invalid_token() {
    let (app, _) = test_app().await;

    let (status, value) = send(
        &app,
        Method::GET,
        "/profile",
        None,
        Some("Bearer not.a.token"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(value["message"], "Invalid token");
}

#[tokio::test]
async fn test_profile_with_expired_token() {
    let (app, clock) = test_app().await;
    register(&app, "alice", "wonderland").await;
    let token = login_token(&app, "alice", "wonderland").await;

    clock.advance_seconds(60 * 60 + 1);
    let (status, value) = send(
        &app,
        Method::GET,
        "/profile",
        None,
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(value["message"], "Token has expired");
}

#[tokio::test]
async fn test_profile_for_missing_user() {
    let (app, clock) = test_app().await;
    let issuer = TokenIssuer::new(&test_secret(), clock);
    let token = issuer.issue(4242, "ghost", Duration::hours(1)).unwrap();

    let (status, value) = send(
        &app,
        Method::GET,
        "/profile",
        None,
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["message"], "User not found");
}

#[tokio::test]
async fn test_create_review_requires_token() {
    let (app, _) = test_app().await;

    let body = json!({ "rating": 5, "review": "Great trip" });
    let (status, _) = send(&app, Method::POST, "/reviews", Some(body), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_reviews() {
    let (app, _) = test_app().await;
    register(&app, "alice", "wonderland").await;
    let token = login_token(&app, "alice", "wonderland").await;

    let body = json!({ "rating": 4, "review": "Quiet beaches, great food" });
    let (status, value) = send(
        &app,
        Method::POST,
        "/reviews",
        Some(body),
        Some(&format!("Bearer {token}")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["review"]["username"], "alice");

    let (status, value) = send(&app, Method::GET, "/reviews", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let reviews = value["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 4);
    assert_eq!(reviews[0]["review"], "Quiet beaches, great food");
}

#[tokio::test]
async fn test_create_review_rejects_bad_rating() {
    let (app, _) = test_app().await;
    register(&app, "alice", "wonderland").await;
    let token = login_token(&app, "alice", "wonderland").await;

    let body = json!({ "rating": 9, "review": "Off the charts" });
    let (status, _) = send(
        &app,
        Method::POST,
        "/reviews",
        Some(body),
        Some(&format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
