//! Session lifecycle: login, persistence across processes, logout.

use httpmock::prelude::*;
use serde_json::json;

use lotus_integration_tests::{TEST_TOKEN, sign_in, state_at, test_state};
use lotus_storefront::StoreError;

#[tokio::test]
async fn login_issues_bearer_for_cart_calls() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let cart_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/carts")
                .header("authorization", format!("Bearer {TEST_TOKEN}"));
            then.status(200).json_body(json!({"cartItems": []}));
        })
        .await;

    let cart = state.cart().load().await.expect("authenticated load");
    assert!(cart.is_empty());
    cart_mock.assert_async().await;
}

#[tokio::test]
async fn session_survives_a_new_process() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");

    let first = state_at(&server, path.clone());
    sign_in(&first, &server).await;

    // A second state over the same file is a fresh process start.
    let second = state_at(&server, path);
    let identity = second.session().restore().expect("persisted session");
    assert_eq!(identity.email.as_str(), "user@example.com");

    let cart_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/carts")
                .header("authorization", format!("Bearer {TEST_TOKEN}"));
            then.status(200).json_body(json!({"cartItems": []}));
        })
        .await;
    second.cart().load().await.expect("restored token works");
    cart_mock.assert_async().await;
}

#[tokio::test]
async fn logout_makes_cart_load_fail_without_network() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let cart_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/carts");
            then.status(200).json_body(json!({"cartItems": []}));
        })
        .await;

    state.session().logout();

    let err = state.cart().load().await.expect_err("signed out");
    assert!(matches!(err, StoreError::Unauthenticated));
    // The gate fires before any request is issued.
    assert_eq!(cart_mock.hits_async().await, 0);
}

#[tokio::test]
async fn failed_login_leaves_session_untouched() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);

    let login_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(401)
                .json_body(json!({"message": "Invalid credentials"}));
        })
        .await;

    let err = state
        .session()
        .login(state.api(), "user@example.com", "wrong")
        .await
        .expect_err("bad credentials");
    assert!(matches!(err, StoreError::Rejected(message) if message == "Invalid credentials"));
    assert!(state.session().identity().is_none());
    assert!(!state.config().session_path.exists());
    login_mock.assert_async().await;
}

#[tokio::test]
async fn register_validates_locally_before_any_call() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);

    let register_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/register");
            then.status(201).json_body(json!({
                "access_token": TEST_TOKEN,
                "user": {"id": 2, "email": "new@example.com", "isAdmin": false}
            }));
        })
        .await;

    let short = state
        .session()
        .register(state.api(), "new@example.com", "abc")
        .await
        .expect_err("short password");
    assert!(matches!(short, StoreError::Validation(_)));

    let bad_email = state
        .session()
        .register(state.api(), "not-an-email", "password1")
        .await
        .expect_err("malformed email");
    assert!(matches!(bad_email, StoreError::Validation(_)));

    assert_eq!(register_mock.hits_async().await, 0);

    // With valid input the registration goes through and signs in.
    let identity = state
        .session()
        .register(state.api(), "new@example.com", "password1")
        .await
        .expect("valid registration");
    assert_eq!(identity.email.as_str(), "new@example.com");
    register_mock.assert_async().await;
}

#[tokio::test]
async fn corrupt_session_file_restores_as_signed_out() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "token=oops").expect("write corrupt file");

    let state = state_at(&server, path);
    assert!(state.session().restore().is_none());
    assert!(state.session().identity().is_none());
}
