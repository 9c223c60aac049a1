//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use hotellisting_api::{AppState, build_router};
use hotellisting_auth::Registration;
use hotellisting_core::config::AppConfig;
use hotellisting_database::Backend;
use hotellisting_entity::UserRole;

/// Signing secret used by every test app.
pub const TEST_SECRET: &str = "integration-test-signing-secret";

/// Seeded administrator account.
pub const ADMIN_EMAIL: &str = "admin@hotellisting.test";
/// Seeded plain user account.
pub const USER_EMAIL: &str = "user@hotellisting.test";
/// Password of both seeded accounts.
pub const PASSWORD: &str = "P@ssword1";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared application state
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application over the seeded memory backend, with
    /// one administrator and one plain user registered.
    pub async fn new() -> Self {
        let config = AppConfig::in_memory(TEST_SECRET);
        let state =
            AppState::new(config, Backend::in_memory()).expect("Failed to build app state");

        for (email, roles) in [
            (ADMIN_EMAIL, vec![UserRole::Administrator]),
            (USER_EMAIL, vec![UserRole::User]),
        ] {
            state
                .auth_manager
                .register(Registration {
                    email: email.to_string(),
                    password: PASSWORD.to_string(),
                    first_name: "Test".to_string(),
                    last_name: "Account".to_string(),
                    roles,
                })
                .await
                .expect("Failed to register test user");
        }

        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Login and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .request("POST", "/api/account/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::ACCEPTED,
            "Login failed: {:?}",
            response.body
        );

        response
            .body
            .get("token")
            .and_then(|v| v.as_str())
            .expect("No token in login response")
            .to_string()
    }

    /// Token of the seeded administrator
    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, PASSWORD).await
    }

    /// Token of the seeded plain user
    pub async fn user_token(&self) -> String {
        self.login(USER_EMAIL, PASSWORD).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` field of an error body.
    pub fn error_kind(&self) -> Option<&str> {
        self.body.get("error").and_then(|v| v.as_str())
    }
}
