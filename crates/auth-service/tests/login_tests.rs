//! End-to-end tests for `POST /auth/login` against a spawned auth service.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use auth_service::repositories::users::mock::InMemoryUserStore;
use auth_test_utils::*;
use serde_json::json;
use std::time::Duration;

async fn post_login(server: &TestAuthServer, body: serde_json::Value) -> Result<reqwest::Response> {
    Ok(reqwest::Client::new()
        .post(format!("{}/auth/login", server.url()))
        .json(&body)
        .send()
        .await?)
}

#[tokio::test]
async fn test_login_issues_token_for_valid_credentials() -> Result<()> {
    let server = TestAuthServer::spawn_with_user("ada@example.com", "password123", "ADMIN").await?;

    let response = post_login(
        &server,
        json!({"email": "ada@example.com", "password": "password123"}),
    )
    .await?;

    assert_eq!(response.status(), 200);
    let token = response.text().await?;

    token
        .assert_valid_jwt()
        .assert_for_subject("ada@example.com")
        .assert_has_role("ADMIN")
        .assert_expires_in(3600);
    assert!(!test_validator().is_invalid(&token));

    Ok(())
}

#[tokio::test]
async fn test_login_ttl_follows_configuration() -> Result<()> {
    let store = InMemoryUserStore::new().with_user(
        "bob@example.com",
        &test_password_hash("password123"),
        "USER",
    );
    let server = TestAuthServer::spawn_with_ttl(store, Duration::from_millis(120_000)).await?;

    let token = post_login(
        &server,
        json!({"email": "bob@example.com", "password": "password123"}),
    )
    .await?
    .text()
    .await?;

    token.assert_expires_in(120);
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_look_identical() -> Result<()> {
    let server = TestAuthServer::spawn_with_user("ada@example.com", "password123", "ADMIN").await?;

    let wrong_password = post_login(
        &server,
        json!({"email": "ada@example.com", "password": "not-the-password"}),
    )
    .await?;
    let unknown_user = post_login(
        &server,
        json!({"email": "nobody@example.com", "password": "password123"}),
    )
    .await?;

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_user.status(), 401);

    let a: serde_json::Value = wrong_password.json().await?;
    let b: serde_json::Value = unknown_user.json().await?;
    assert_eq!(a["message"], b["message"]);
    assert_eq!(a["details"], b["details"]);
    assert_eq!(a["status"], 401);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_invalid_fields() -> Result<()> {
    let server = TestAuthServer::spawn(InMemoryUserStore::new()).await?;

    let bad_email = post_login(&server, json!({"email": "not-an-email", "password": "password123"})).await?;
    assert_eq!(bad_email.status(), 400);

    let short_password = post_login(&server, json!({"email": "ada@example.com", "password": "123"})).await?;
    assert_eq!(short_password.status(), 400);

    let missing_field = post_login(&server, json!({"email": "ada@example.com"})).await?;
    assert_eq!(missing_field.status(), 400);

    Ok(())
}

#[tokio::test]
async fn test_login_store_outage_is_internal_error() -> Result<()> {
    let server = TestAuthServer::spawn(InMemoryUserStore::failing()).await?;

    let response = post_login(
        &server,
        json!({"email": "ada@example.com", "password": "password123"}),
    )
    .await?;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["message"], "An internal database error occurred");

    Ok(())
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let server = TestAuthServer::spawn(InMemoryUserStore::new()).await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");
    Ok(())
}
