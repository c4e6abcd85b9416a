//! Cart behavior over real HTTP, one cookie jar per visitor.

#![allow(clippy::unwrap_used)]

use pineapple_stall_integration_tests::{StubCatalog, TestContext, fixture_products};
use reqwest::StatusCode;
use tokio::task::JoinSet;

#[tokio::test]
async fn test_add_and_remove_updates_badge() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;
    let client = &ctx.client;
    assert_eq!(ctx.badge(client).await, 0);

    let response = ctx.htmx_post(client, "/cart/add", &[("product_id", "1")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["hx-trigger"], "cart-updated");
    assert_eq!(ctx.badge(client).await, 1);

    ctx.htmx_post(client, "/cart/add", &[("product_id", "1")]).await;
    ctx.htmx_post(client, "/cart/add", &[("product_id", "3")]).await;
    assert_eq!(ctx.badge(client).await, 3);

    let drawer = ctx
        .htmx_post(client, "/cart/remove", &[("product_id", "1")])
        .await
        .text()
        .await
        .unwrap();
    assert_eq!(ctx.badge(client).await, 2);
    // 1 x $109.95 + 1 x $10.00
    assert!(drawer.contains("$119.95"), "{drawer}");

    ctx.htmx_post(client, "/cart/remove", &[("product_id", "1")]).await;
    ctx.htmx_post(client, "/cart/remove", &[("product_id", "3")]).await;
    assert_eq!(ctx.badge(client).await, 0);

    let drawer = client
        .get(ctx.url("/cart/drawer"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(drawer.contains("No items in cart."));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_adds_are_all_counted() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;

    // The first add creates the session the rest share
    ctx.htmx_post(&ctx.client, "/cart/add", &[("product_id", "1")])
        .await;

    let mut adds = JoinSet::new();
    for i in 0..19 {
        let client = ctx.client.clone();
        let url = ctx.url("/cart/add");
        let product_id = if i % 2 == 0 { "2" } else { "1" };
        adds.spawn(async move {
            client
                .post(url)
                .header("HX-Request", "true")
                .form(&[("product_id", product_id)])
                .send()
                .await
                .unwrap()
                .status()
        });
    }
    while let Some(status) = adds.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    assert_eq!(ctx.badge(&ctx.client).await, 20);
}

#[tokio::test]
async fn test_removing_absent_product_changes_nothing() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;
    let client = &ctx.client;

    ctx.htmx_post(client, "/cart/add", &[("product_id", "2")]).await;
    let response = ctx.htmx_post(client, "/cart/remove", &[("product_id", "3")]).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.badge(client).await, 1);
}

#[tokio::test]
async fn test_unknown_product_is_rejected() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;
    let client = &ctx.client;

    let response = ctx.htmx_post(client, "/cart/add", &[("product_id", "99")]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.badge(client).await, 0);
}

#[tokio::test]
async fn test_visitors_have_separate_carts() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;
    let alice = TestContext::visitor();
    let bob = TestContext::visitor();

    ctx.htmx_post(&alice, "/cart/add", &[("product_id", "1")]).await;
    ctx.htmx_post(&alice, "/cart/add", &[("product_id", "2")]).await;
    ctx.htmx_post(&bob, "/cart/add", &[("product_id", "3")]).await;

    assert_eq!(ctx.badge(&alice).await, 2);
    assert_eq!(ctx.badge(&bob).await, 1);
}

#[tokio::test]
async fn test_plain_form_post_lands_back_on_shell() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;
    let client = &ctx.client;

    let response = client
        .post(ctx.url("/cart/add"))
        .form(&[("product_id", "2")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.url().path(), "/");

    let html = response.text().await.unwrap();
    assert!(html.contains("class=\"product-grid\""));
    assert_eq!(ctx.badge(client).await, 1);
}

#[tokio::test]
async fn test_drawer_open_and_close() {
    let ctx = TestContext::new(StubCatalog::Products(fixture_products())).await;
    let client = &ctx.client;

    let opened = ctx.htmx_post(client, "/cart/open", &[]).await.text().await.unwrap();
    assert!(opened.contains("class=\"drawer open\""));

    let shell = client.get(ctx.url("/")).send().await.unwrap().text().await.unwrap();
    assert!(shell.contains("class=\"drawer open\""));

    let closed = ctx.htmx_post(client, "/cart/close", &[]).await.text().await.unwrap();
    assert!(closed.contains("class=\"drawer\""));
    assert_eq!(ctx.badge(client).await, 0);
}
