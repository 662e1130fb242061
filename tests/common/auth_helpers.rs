//! Authentication test helpers
//!
//! Utilities for creating test users through the HTTP surface and building
//! Authorization headers.

use serde_json::json;
use uuid::Uuid;

use super::harness::TestApp;

/// Credentials and tokens of a registered, logged-in test user
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Register and log in through the API
pub async fn create_test_user(app: &TestApp, email: &str, password: &str) -> TestUser {
    let registered = app
        .post_json(
            "/api/register",
            json!({ "email": email, "password": password }),
        )
        .await;
    assert_eq!(registered.status, axum::http::StatusCode::CREATED, "{}", registered.body);

    let login = app
        .post_json("/api/login", json!({ "email": email, "password": password }))
        .await;
    assert_eq!(login.status, axum::http::StatusCode::OK, "{}", login.body);

    TestUser {
        id: login.body["user"]["id"].as_i64().expect("numeric id"),
        email: email.to_string(),
        password: password.to_string(),
        access_token: login.body["access_token"].as_str().expect("access token").to_string(),
        refresh_token: login.body["refresh_token"].as_str().expect("refresh token").to_string(),
    }
}

/// Create a test user with a unique email
pub async fn create_unique_test_user(app: &TestApp) -> TestUser {
    let email = format!("test_{}@example.com", Uuid::new_v4().simple());
    create_test_user(app, &email, "test_password_123").await
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
