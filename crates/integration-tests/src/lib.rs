//! Integration tests for Lotus.
//!
//! Each test spins up an `httpmock` server playing the storefront backend
//! and drives the client library against it over real HTTP. Session files
//! live in per-test temporary directories.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lotus-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session` - identity persistence, login/logout lifecycle
//! - `cart_flow` - the mutate-then-reload cart protocol
//! - `checkout_flow` - the cart-to-order state machine
//! - `orders` - order history and status rendering

use std::path::PathBuf;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::{Value, json};

use lotus_storefront::config::StorefrontConfig;
use lotus_storefront::state::AppState;

/// Token issued by the mock login endpoint.
pub const TEST_TOKEN: &str = "test-token-1";

/// Client state pointed at the mock backend with a session file at `path`.
#[must_use]
pub fn state_at(server: &MockServer, session_path: PathBuf) -> AppState {
    let config = StorefrontConfig {
        api_url: url::Url::parse(&server.base_url()).expect("valid base url"),
        session_path,
        http_timeout: Duration::from_secs(5),
    };
    AppState::new(config).expect("client state")
}

/// Client state with a session file in a fresh temporary directory.
///
/// The directory guard must outlive the state.
#[must_use]
pub fn test_state(server: &MockServer) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = state_at(server, dir.path().join("session.json"));
    (state, dir)
}

/// Sign the state in through a one-shot mock of `POST /auth/login`.
pub async fn sign_in(state: &AppState, server: &MockServer) {
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({
                "access_token": TEST_TOKEN,
                "user": {"id": 1, "email": "user@example.com", "isAdmin": false}
            }));
        })
        .await;

    state
        .session()
        .login(state.api(), "user@example.com", "password1")
        .await
        .expect("login against mock backend");

    mock.delete_async().await;
}

/// Backend-shaped product JSON.
#[must_use]
pub fn product_json(id: i32, name: &str, price: &str, slug: &str, stock: u32) -> Value {
    json!({
        "id": id,
        "productName": name,
        "price": price,
        "slug": slug,
        "stockQuantity": stock,
        "images": [
            {"imageUrl": format!("/uploads/{slug}.jpg"), "isThumbnail": true}
        ],
        "category": {"id": 1, "categoryName": "Tea"}
    })
}

/// Backend-shaped cart line JSON.
#[must_use]
pub fn cart_line_json(line_id: i32, quantity: u32, product: Value) -> Value {
    json!({
        "id": line_id,
        "quantity": quantity,
        "product": product
    })
}

/// Envelope of `GET /carts`.
#[must_use]
pub fn cart_json(lines: Vec<Value>) -> Value {
    json!({ "cartItems": lines })
}

/// Backend-shaped order JSON.
#[must_use]
pub fn order_json(id: i32, status: &str, total: &str) -> Value {
    json!({
        "id": id,
        "phone": "0123456789",
        "address": "12 Hang Gai, Hanoi",
        "totalAmount": total,
        "status": status,
        "note": "",
        "createdAt": "2025-11-02T09:30:00Z",
        "orderItems": [
            {"productName": "Green tea", "price": "45000", "quantity": 2}
        ]
    })
}
