//! Catalog fetch outcomes as seen through the shell page.

#![allow(clippy::unwrap_used)]

use pineapple_stall_core::{Product, ProductId};
use pineapple_stall_integration_tests::{StubCatalog, TestContext, fixture_products};
use pineapple_stall_storefront::catalog::CatalogState;
use reqwest::StatusCode;

#[tokio::test]
async fn test_grid_lists_every_product_in_order() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;

    let response = ctx.client.get(ctx.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();

    let backpack = html.find("Foldsack No. 1 Backpack").unwrap();
    let shirt = html.find("Slim Fit T-Shirts").unwrap();
    let ring = html.find("Solid Gold Petite Micropave").unwrap();
    assert!(backpack < shirt && shirt < ring);
    assert!(html.contains("$109.95"));
    assert!(html.contains("$22.30"));
    assert!(html.contains("$10.00"));

    let ready = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_matches_decoded_fixture() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;
    let expected: Vec<Product> = serde_json::from_value(fixture_products()).unwrap();

    let CatalogState::Ready(products) = ctx.state.catalog().state() else {
        panic!("catalog should be ready");
    };
    assert_eq!(products.as_ref(), expected.as_slice());
    assert_eq!(
        ctx.state.catalog().find(ProductId::new(2)).map(|p| p.title),
        Some("Mens Casual Premium Slim Fit T-Shirts".to_string())
    );
}

#[tokio::test]
async fn test_catalog_is_fetched_once() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;

    for _ in 0..3 {
        let response = ctx.client.get(ctx.url("/")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert!(ctx.state.catalog().start_loading().is_none());
    assert_eq!(ctx.catalog_hits(), 1);
}

#[tokio::test]
async fn test_upstream_error_shows_generic_message() {
    let ctx = TestContext::new(StubCatalog::Status(StatusCode::INTERNAL_SERVER_ERROR)).await;

    let response = ctx.client.get(ctx.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let html = response.text().await.unwrap();
    assert!(html.contains("Something went wrong..."));

    let ready = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);

    // No retry on later visits
    ctx.client.get(ctx.url("/")).send().await.unwrap();
    assert_eq!(ctx.catalog_hits(), 1);
}

#[tokio::test]
async fn test_malformed_catalog_fails() {
    let ctx = TestContext::new(StubCatalog::Raw(r#"{"products": []}"#)).await;

    let response = ctx.client.get(ctx.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.text().await.unwrap().contains("Something went wrong..."));
}

#[tokio::test]
async fn test_add_after_failure_is_unavailable() {
    let ctx = TestContext::new(StubCatalog::Status(StatusCode::BAD_GATEWAY)).await;

    let response = ctx
        .htmx_post(&ctx.client, "/cart/add", &[("product_id", "1")])
        .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ctx.badge(&ctx.client).await, 0);
}

#[tokio::test]
async fn test_empty_catalog_renders_empty_grid() {
    let ctx = TestContext::new(StubCatalog::Raw("[]")).await;

    let response = ctx.client.get(ctx.url("/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("class=\"product-grid\""));
    assert!(!html.contains("class=\"item\""));
}
