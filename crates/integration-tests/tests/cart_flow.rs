//! The cart aggregate's mutate-then-reload protocol against a mock backend.

use httpmock::Method::PATCH;
use httpmock::prelude::*;
use serde_json::json;

use lotus_core::{CartLineId, Price, ProductId};
use lotus_integration_tests::{cart_json, cart_line_json, product_json, sign_in, test_state};
use lotus_storefront::StoreError;

#[tokio::test]
async fn subtotal_is_derived_from_loaded_lines() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let cart_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/carts");
            then.status(200).json_body(cart_json(vec![
                cart_line_json(1, 2, product_json(10, "Product A", "100000", "product-a", 20)),
                cart_line_json(2, 1, product_json(11, "Product B", "50000", "product-b", 5)),
            ]));
        })
        .await;

    let cart = state.cart().load().await.expect("load");
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.subtotal(), Price::from(250_000));
    cart_mock.assert_async().await;
}

#[tokio::test]
async fn add_reloads_and_reflects_backend_merge() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let add_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/carts/items")
                .json_body(json!({"productId": 10, "quantity": 1}));
            then.status(201);
        })
        .await;

    // The backend merged the add into an existing line: one line, qty 3,
    // not two lines.
    let reload_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/carts");
            then.status(200).json_body(cart_json(vec![cart_line_json(
                1,
                3,
                product_json(10, "Product A", "100000", "product-a", 20),
            )]));
        })
        .await;

    let cart = state
        .cart()
        .add_line(ProductId::new(10), 1)
        .await
        .expect("add");

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.lines()[0].quantity, 3);
    assert_eq!(cart.subtotal(), Price::from(300_000));
    add_mock.assert_async().await;
    reload_mock.assert_async().await;
}

#[tokio::test]
async fn zero_quantity_is_rejected_before_any_network_call() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let patch_mock = server
        .mock_async(|when, then| {
            when.method(PATCH).path_contains("/carts/items/");
            then.status(200);
        })
        .await;

    let err = state
        .cart()
        .set_quantity(CartLineId::new(1), 0)
        .await
        .expect_err("below minimum");
    assert!(matches!(err, StoreError::Validation(_)));

    let err = state
        .cart()
        .add_line(ProductId::new(10), 0)
        .await
        .expect_err("below minimum");
    assert!(matches!(err, StoreError::Validation(_)));

    assert_eq!(patch_mock.hits_async().await, 0);
}

#[tokio::test]
async fn stock_rejection_surfaces_verbatim_and_reload_keeps_backend_value() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let patch_mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/carts/items/1")
                .json_body(json!({"quantity": 99}));
            then.status(400)
                .json_body(json!({"message": "Quantity exceeds available stock"}));
        })
        .await;

    let cart_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/carts");
            then.status(200).json_body(cart_json(vec![cart_line_json(
                1,
                2,
                product_json(10, "Product A", "100000", "product-a", 2),
            )]));
        })
        .await;

    let err = state
        .cart()
        .set_quantity(CartLineId::new(1), 99)
        .await
        .expect_err("beyond stock");
    assert!(
        matches!(err, StoreError::Rejected(message) if message == "Quantity exceeds available stock")
    );
    patch_mock.assert_async().await;

    // The authoritative reload shows the backend's value, not the request.
    let cart = state.cart().load().await.expect("reload");
    assert_eq!(cart.lines()[0].quantity, 2);
    cart_mock.assert_async().await;
}

#[tokio::test]
async fn removing_the_only_line_leaves_an_empty_cart() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let delete_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/carts/items/7");
            then.status(200);
        })
        .await;

    let reload_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/carts");
            then.status(200).json_body(cart_json(vec![]));
        })
        .await;

    let cart = state
        .cart()
        .remove_line(CartLineId::new(7))
        .await
        .expect("remove");
    assert!(cart.is_empty());
    assert_eq!(cart.subtotal(), Price::ZERO);
    delete_mock.assert_async().await;
    reload_mock.assert_async().await;
}

#[tokio::test]
async fn clear_deletes_all_lines_then_reloads() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let clear_mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/carts");
            then.status(200);
        })
        .await;

    let reload_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/carts");
            then.status(200).json_body(cart_json(vec![]));
        })
        .await;

    let cart = state.cart().clear().await.expect("clear");
    assert!(cart.is_empty());
    clear_mock.assert_async().await;
    reload_mock.assert_async().await;
}

#[tokio::test]
async fn expired_token_maps_to_unauthenticated() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);
    sign_in(&state, &server).await;

    let cart_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/carts");
            then.status(401).json_body(json!({"message": "Unauthorized"}));
        })
        .await;

    let err = state.cart().load().await.expect_err("expired token");
    assert!(matches!(err, StoreError::Unauthenticated));
    cart_mock.assert_async().await;
}
