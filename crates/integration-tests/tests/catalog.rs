//! Catalog reads: filters, caching, stale references.

use httpmock::prelude::*;
use serde_json::json;

use lotus_core::CategoryId;
use lotus_integration_tests::{product_json, test_state};
use lotus_storefront::StoreError;

#[tokio::test]
async fn products_pass_filters_as_query_params() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);

    let filtered_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/products")
                .query_param("search", "tea")
                .query_param("categoryId", "3");
            then.status(200)
                .json_body(json!([product_json(10, "Green tea", "45000", "green-tea", 8)]));
        })
        .await;

    let products = state
        .api()
        .products(Some("tea"), Some(CategoryId::new(3)))
        .await
        .expect("filtered listing");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].slug, "green-tea");
    filtered_mock.assert_async().await;
}

#[tokio::test]
async fn unfiltered_listing_is_served_from_cache_on_repeat() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);

    let listing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/products");
            then.status(200)
                .json_body(json!([product_json(10, "Green tea", "45000", "green-tea", 8)]));
        })
        .await;

    let first = state.api().products(None, None).await.expect("listing");
    let second = state.api().products(None, None).await.expect("listing");
    assert_eq!(first.len(), second.len());
    // Second read came from the cache.
    assert_eq!(listing_mock.hits_async().await, 1);
}

#[tokio::test]
async fn filtered_listings_always_hit_the_backend() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);

    let search_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/products").query_param("search", "tea");
            then.status(200).json_body(json!([]));
        })
        .await;

    state.api().products(Some("tea"), None).await.expect("search");
    state.api().products(Some("tea"), None).await.expect("search");
    assert_eq!(search_mock.hits_async().await, 2);
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);

    let missing_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/products/slug/gone");
            then.status(404)
                .json_body(json!({"message": "Product not found"}));
        })
        .await;

    let err = state
        .api()
        .product_by_slug("gone")
        .await
        .expect_err("stale slug");
    assert!(matches!(err, StoreError::NotFound(message) if message == "Product not found"));
    missing_mock.assert_async().await;
}

#[tokio::test]
async fn categories_are_cached() {
    let server = MockServer::start_async().await;
    let (state, _dir) = test_state(&server);

    let categories_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/categories");
            then.status(200).json_body(json!([
                {"id": 1, "categoryName": "Tea"},
                {"id": 2, "categoryName": "Ceramics"}
            ]));
        })
        .await;

    let first = state.api().categories().await.expect("categories");
    assert_eq!(first.len(), 2);
    state.api().categories().await.expect("categories");
    assert_eq!(categories_mock.hits_async().await, 1);
}
