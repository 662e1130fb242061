//! In-memory application harness
//!
//! Builds the full router over in-memory stores and a queueing mailer, and
//! drives it with `tower::ServiceExt::oneshot`, so the HTTP surface is tested
//! without a network listener or a database.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use reelbase::backend::auth::memory::{MemoryCredentialStore, MemoryRefreshTokenStore};
use reelbase::backend::auth::SessionManager;
use reelbase::backend::mail::{MemoryMailer, SentMail};
use reelbase::backend::routes::create_router;
use reelbase::backend::server::{AppState, AuthConfig};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_FRONTEND_URL: &str = "https://reel.test";

/// Response status and parsed JSON body (`Null` when the body is not JSON)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub sessions: SessionManager,
    pub users: Arc<MemoryCredentialStore>,
    pub refresh_tokens: Arc<MemoryRefreshTokenStore>,
    pub mailer: Arc<MemoryMailer>,
    pub config: AuthConfig,
}

/// Auth settings for tests: fixed secret and bcrypt's minimum cost
pub fn test_config() -> AuthConfig {
    AuthConfig::builder()
        .jwt_secret(TEST_SECRET)
        .bcrypt_cost(4)
        .frontend_url(TEST_FRONTEND_URL)
        .build()
        .expect("valid test config")
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AuthConfig) -> Self {
        let users = Arc::new(MemoryCredentialStore::new());
        let refresh_tokens = Arc::new(MemoryRefreshTokenStore::new(&config));
        let mailer = Arc::new(MemoryMailer::new());
        let sessions = SessionManager::new(
            &config,
            users.clone(),
            refresh_tokens.clone(),
            mailer.clone(),
        );
        let router = create_router(AppState::new(sessions.clone(), false), &[]);

        Self {
            router,
            sessions,
            users,
            refresh_tokens,
            mailer,
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body }
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, path: &str, authorization: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(path);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    /// Next mail handed to the mailer, if one arrives within `wait`
    pub async fn next_mail(&self, wait: Duration) -> Option<SentMail> {
        tokio::time::timeout(wait, self.mailer.next_message())
            .await
            .ok()
            .flatten()
    }
}
