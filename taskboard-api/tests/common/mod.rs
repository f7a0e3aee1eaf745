//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - In-memory store and manual clock wired into a real router
//! - Bearer token helpers
//! - Request/response helpers, with an optional peer address per request

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::clock::ManualClock;
use taskboard_shared::notifications::transport::LogTransport;
use taskboard_shared::store::memory::MemoryStore;
use tower::Service as _;

/// Opaque token accepted when no JWT secret is configured
pub const OPAQUE_TOKEN: &str = "test-token-0123456789";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub token: String,
}

/// Decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestContext {
    /// Creates a context with default configuration (opaque tokens, soft delete)
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a context with custom configuration
    pub fn with_config(config: Config) -> Self {
        let clock = Arc::new(ManualClock::default());
        let state = AppState::new(
            config,
            Arc::new(MemoryStore::new()),
            clock.clone(),
            Arc::new(LogTransport),
        );
        let app = build_router(state.clone());

        TestContext {
            app,
            state,
            clock,
            token: OPAQUE_TOKEN.to_string(),
        }
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Sends a request without credentials
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        self.send_with(method, uri, body, None, None).await
    }

    /// Sends a request with the context's bearer token
    pub async fn send_authed(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        self.send_with(method, uri, body, Some(&self.auth_header()), None)
            .await
    }

    /// Sends a request with full control over auth and the peer address
    pub async fn send_with(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
        peer: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = authorization {
            builder = builder.header("authorization", auth);
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.dispatch(request, peer).await
    }

    /// Sends a GET from `peer` carrying an `X-Forwarded-For` header
    pub async fn get_forwarded(&self, uri: &str, peer: &str, forwarded_for: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-forwarded-for", forwarded_for)
            .body(Body::empty())
            .unwrap();

        self.dispatch(request, Some(peer)).await
    }

    async fn dispatch(&self, mut request: Request<Body>, peer: Option<&str>) -> TestResponse {
        if let Some(ip) = peer {
            let ip: IpAddr = ip.parse().unwrap();
            request
                .extensions_mut()
                .insert(ConnectInfo(SocketAddr::new(ip, 40000)));
        }

        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Creates a user through the API and returns its JSON
    pub async fn create_user(&self, email: &str, name: &str) -> Value {
        let response = self
            .send_authed(
                "POST",
                "/v1/users",
                Some(serde_json::json!({ "email": email, "name": name, "role": "member" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["user"].clone()
    }

    /// Creates a task assigned to `assignee_id` and returns its JSON
    pub async fn create_task(&self, assignee_id: &str, title: &str) -> Value {
        let response = self
            .send_authed(
                "POST",
                "/v1/tasks",
                Some(serde_json::json!({
                    "title": title,
                    "description": "integration test task",
                    "assigneeId": assignee_id,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["task"].clone()
    }
}
