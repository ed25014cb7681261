//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, PROVIDER_ACCOUNT_SID,
//!   PROVIDER_AUTH_TOKEN, GATEWAY_BASE_URL
//!
//! Run with: cargo test -p integration-tests --test api_tests

use chrono::{DateTime, Utc};
use integration_tests::{assert_json, assert_status, check_test_env, TestServer};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct MarkReadBody {
    success: bool,
    phone_number: String,
    last_read_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: Uuid,
    username: String,
}

/// Create a user through the API and return it
async fn create_user(server: &TestServer) -> UserBody {
    let username = format!("it_user_{}", Uuid::new_v4().simple());
    let response = server
        .post(
            "/api/users",
            &json!({
                "username": username,
                "display_name": "Integration Test",
                "password": "integration-pass",
            }),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Mark-Read Gateway Tests
// ============================================================================

#[tokio::test]
async fn test_mark_read_upserts_and_lists() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = create_user(&server).await;

    let response = server
        .patch(
            "/api/conversations/%2B15559990001/mark-read",
            &json!({ "userId": user.id }),
        )
        .await
        .unwrap();
    let body: MarkReadBody = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(body.success);
    assert_eq!(body.phone_number, "+15559990001");
    assert!(body.last_read_at <= Utc::now());

    // The marker shows up in the read-state listing
    let response = server
        .get(&format!("/api/conversations/read-states?user_id={}", user.id))
        .await
        .unwrap();
    let states: Vec<serde_json::Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(states
        .iter()
        .any(|s| s["phone_number"] == "+15559990001"));
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = create_user(&server).await;
    let body = json!({ "userId": user.id });

    let first = server
        .patch("/api/conversations/%2B15559990002/mark-read", &body)
        .await
        .unwrap();
    let first: MarkReadBody = assert_json(first, StatusCode::OK).await.unwrap();

    let second = server
        .patch("/api/conversations/%2B15559990002/mark-read", &body)
        .await
        .unwrap();
    let second: MarkReadBody = assert_json(second, StatusCode::OK).await.unwrap();

    assert_eq!(first.phone_number, second.phone_number);
    // The second marker is at or after the first
    assert!(second.last_read_at >= first.last_read_at);
}

#[tokio::test]
async fn test_mark_read_rejects_bad_input() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    // Missing userId in the body
    let response = server
        .patch("/api/conversations/%2B15559990003/mark-read", &json!({}))
        .await
        .unwrap();
    let err: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!err.error.is_empty());

    // Malformed phone number in the path
    let response = server
        .patch(
            "/api/conversations/not-a-number/mark-read",
            &json!({ "userId": Uuid::new_v4() }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_mark_read_wrong_method_is_405() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post(
            "/api/conversations/%2B15559990004/mark-read",
            &json!({ "userId": Uuid::new_v4() }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::METHOD_NOT_ALLOWED)
        .await
        .unwrap();
}

// ============================================================================
// User and Assignment Tests
// ============================================================================

#[tokio::test]
async fn test_login_round_trip() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = create_user(&server).await;

    let response = server
        .post(
            "/api/auth/login",
            &json!({ "username": user.username, "password": "integration-pass" }),
        )
        .await
        .unwrap();
    let logged_in: UserBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(logged_in.id, user.id);

    let response = server
        .post(
            "/api/auth/login",
            &json!({ "username": user.username, "password": "wrong-password" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_assignment_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = create_user(&server).await;
    let path = format!("/api/users/{}/phone-number", user.id);

    let response = server
        .put(&path, &json!({ "phone_number": "+15559990100" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get(&path).await.unwrap();
    let assignment: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(assignment["phone_number"], "+15559990100");

    let response = server.delete(&path).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}
