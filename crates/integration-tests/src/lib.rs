//! Integration tests for Pineapple Stall.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pineapple-stall-integration-tests
//! ```
//!
//! No external services are needed. Each [`TestContext`] starts:
//! - a stub catalog API on an ephemeral port, answering with a fixed
//!   [`StubCatalog`] response and counting requests
//! - the real storefront router on another ephemeral port, pointed at the stub
//!
//! Tests talk to the storefront over HTTP with a cookie-aware `reqwest`
//! client, so the session-held cart behaves exactly as it does for a browser.

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use pineapple_stall_storefront::config::StorefrontConfig;
use pineapple_stall_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// What the stub catalog answers to `GET /products`.
#[derive(Debug, Clone)]
pub enum StubCatalog {
    /// 200 with this JSON body.
    Products(Value),
    /// This status with a plain-text body.
    Status(StatusCode),
    /// 200 with this raw body, labelled as JSON.
    Raw(&'static str),
}

impl StubCatalog {
    fn respond(&self) -> Response {
        match self {
            Self::Products(value) => Json(value.clone()).into_response(),
            Self::Status(status) => (*status, "catalog unavailable").into_response(),
            Self::Raw(body) => ([(header::CONTENT_TYPE, "application/json")], *body).into_response(),
        }
    }
}

/// Three products in the catalog API's shape, including the `rating` field
/// the storefront ignores.
#[must_use]
pub fn fixture_products() -> Value {
    json!([
        {
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style, contrast raglan long sleeve.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        },
        {
            "id": 3,
            "title": "Solid Gold Petite Micropave",
            "price": 10,
            "description": "Satisfaction Guaranteed.",
            "category": "jewelery",
            "image": "https://fakestoreapi.com/img/61sbMiUnoGL._AC_UL640_QL65_ML3_.jpg",
            "rating": { "rate": 3.9, "count": 70 }
        }
    ])
}

/// A running storefront wired to a stub catalog.
pub struct TestContext {
    /// Cookie-aware client, one per simulated visitor.
    pub client: reqwest::Client,
    pub storefront_url: String,
    pub state: AppState,
    catalog_hits: Arc<AtomicUsize>,
}

impl TestContext {
    /// Start a stub catalog and a storefront, and wait for the one-time
    /// catalog fetch to finish (successfully or not).
    pub async fn new(catalog: StubCatalog) -> Self {
        let catalog_hits = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&catalog_hits);
        let stub = Router::new().route(
            "/products",
            get(move || {
                let catalog = catalog.clone();
                let hits = Arc::clone(&hits);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    catalog.respond()
                }
            }),
        );
        let stub_addr = serve(stub).await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            base_url: "http://localhost".to_string(),
            catalog_url: format!("http://{stub_addr}/products")
                .parse()
                .expect("valid catalog url"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config);
        if let Some(handle) = state.catalog().start_loading() {
            handle.await.expect("catalog fetch task panicked");
        }

        let storefront_addr = serve(pineapple_stall_storefront::app(state.clone())).await;

        Self {
            client: Self::visitor(),
            storefront_url: format!("http://{storefront_addr}"),
            state,
            catalog_hits,
        }
    }

    /// A fresh client with its own cookie jar.
    #[must_use]
    pub fn visitor() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("client builds")
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// How many requests the stub catalog has served.
    #[must_use]
    pub fn catalog_hits(&self) -> usize {
        self.catalog_hits.load(Ordering::SeqCst)
    }

    /// POST a cart form the way HTMX does and return the drawer fragment.
    pub async fn htmx_post(&self, client: &reqwest::Client, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        client
            .post(self.url(path))
            .header("HX-Request", "true")
            .form(form)
            .send()
            .await
            .expect("request succeeds")
    }

    /// The badge value for `client`'s session.
    pub async fn badge(&self, client: &reqwest::Client) -> u32 {
        let html = client
            .get(self.url("/cart/count"))
            .send()
            .await
            .expect("request succeeds")
            .text()
            .await
            .expect("body is text");
        parse_badge(&html)
    }
}

/// Extract the number from the badge fragment.
#[must_use]
pub fn parse_badge(html: &str) -> u32 {
    let end = html.rfind("</span>").expect("badge closes");
    let start = html
        .get(..end)
        .and_then(|head| head.rfind('>'))
        .expect("badge opens");
    html.get(start + 1..end)
        .expect("badge body")
        .trim()
        .parse()
        .expect("badge is a number")
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server runs");
    });
    addr
}
