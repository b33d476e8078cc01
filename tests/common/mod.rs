//! Shared helpers for in-process API tests

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookish_server::{
    api,
    config::{AppConfig, AuthConfig, StorageBackend},
    models::TokenClaims,
    repository::{memory::MemoryStore, Repository},
    AppState,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Router over a fresh in-memory store with one registered user
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert_user("Test User", "test@example.com")
            .expect("insert test user");

        let mut config = AppConfig::default();
        config.database.backend = StorageBackend::Memory;
        config.auth = AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            leeway_seconds: 0,
        };

        let state = AppState::new(config, Repository::memory(store.clone()));
        let token = TokenClaims::for_user(user.id, Duration::hours(1))
            .create_token(JWT_SECRET)
            .expect("sign test token");

        Self {
            router: api::router(state),
            store,
            token,
        }
    }

    /// Send a request with the test user's token
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let token = self.token.clone();
        self.call_with_token(method, uri, Some(&token), body).await
    }

    pub async fn call_with_token(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Create a book through the API and return its id
    pub async fn create_book(&self, title: &str, author: &str, year: i32) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/books",
                Some(serde_json::json!({
                    "title": title,
                    "author": author,
                    "publication_year": year,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
        body["data"]["id"].as_i64().expect("created book id")
    }
}
