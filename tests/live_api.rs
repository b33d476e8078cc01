//! Tests against a running server
//!
//! Start the server (for example with `RUN_MODE=development`, which seeds the
//! sample books), then run: `cargo test --test live_api -- --ignored`.
//! `JWT_SECRET` must match the server's and `BOOKISH_TEST_USER_ID` must name
//! an existing user (defaults to 1).

use bookish_server::models::TokenClaims;
use chrono::Duration;
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Token for the configured test user, signed with the shared secret
fn auth_token() -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let user_id = std::env::var("BOOKISH_TEST_USER_ID")
        .ok()
        .and_then(|id| id.parse().ok())
        .unwrap_or(1);

    TokenClaims::for_user(user_id, Duration::minutes(10))
        .create_token(&secret)
        .expect("Failed to sign token")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/books", BASE_URL))
        .bearer_auth(auth_token())
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle() {
    let client = Client::new();
    let token = auth_token();

    // Create book
    let response = client
        .post(format!("{}/api/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "title": "1984",
            "author": "George Orwell",
            "publication_year": 1949
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let book_id = body["data"]["id"].as_i64().expect("No book ID");
    let url = format!("{}/api/books/{}", BASE_URL, book_id);

    // Fetch it back
    let response = client
        .get(&url)
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched["data"]["author"], "George Orwell");

    // Update it
    let response = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({
            "title": "Nineteen Eighty-Four",
            "author": "George Orwell",
            "publication_year": 1949
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    // Delete it
    let response = client
        .delete(&url)
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let response = client
        .get(&url)
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Token not provided");
}
