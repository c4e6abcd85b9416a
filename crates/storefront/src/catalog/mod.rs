//! Product catalog API client.
//!
//! # Architecture
//!
//! - One `GET` against the configured catalog endpoint, no parameters
//! - The response is decoded strictly into [`Product`] records at this
//!   boundary; a single malformed entry fails the whole fetch
//! - The fetch runs once per process in a background task (see [`loader`])
//!   and is never retried
//!
//! # Example
//!
//! ```rust,ignore
//! use pineapple_stall_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(config.catalog_url.clone());
//! let products = client.fetch_products().await?;
//! ```

mod loader;

pub use loader::{Catalog, CatalogState};

use std::collections::HashSet;
use std::sync::Arc;

use pineapple_stall_core::{Product, ProductId};
use reqwest::header::ACCEPT;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Errors that can occur when fetching the catalog.
///
/// Visitors see a single generic message for all of these; the variant is
/// only logged.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Unexpected status: {0}")]
    Status(reqwest::StatusCode),

    /// The body is not a JSON array of products.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The catalog listed the same product ID twice.
    #[error("Duplicate product ID in catalog: {0}")]
    DuplicateProduct(ProductId),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote product catalog.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl CatalogClient {
    /// Create a new catalog client for `endpoint`.
    #[must_use]
    pub fn new(endpoint: Url) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint,
            }),
        }
    }

    /// The catalog endpoint this client reads from.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Fetch every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails, the status is not 2xx, or
    /// the body does not decode into a list of uniquely identified products.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(self.inner.endpoint.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }

        // Get response body as text first so decode errors point at the payload
        let body = response.text().await?;
        let products = decode_products(&body)?;
        debug!(count = products.len(), "Catalog fetched");
        Ok(products)
    }
}

/// Decode a catalog response body.
///
/// # Errors
///
/// Returns `CatalogError::Decode` if any entry is malformed and
/// `CatalogError::DuplicateProduct` if two entries share an ID.
pub fn decode_products(body: &str) -> Result<Vec<Product>, CatalogError> {
    let products: Vec<Product> = serde_json::from_str(body)?;

    let mut seen = HashSet::with_capacity(products.len());
    if let Some(duplicate) = products.iter().find(|product| !seen.insert(product.id)) {
        return Err(CatalogError::DuplicateProduct(duplicate.id));
    }

    Ok(products)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const TWO_PRODUCTS: &str = r#"[
        {
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        },
        {
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts",
            "price": 22.3,
            "description": "Slim-fitting style.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg"
        }
    ]"#;

    #[test]
    fn test_decode_products() {
        let products = decode_products(TWO_PRODUCTS).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, ProductId::new(1));
        assert_eq!(products[1].price.to_string(), "$22.30");
    }

    #[test]
    fn test_decode_empty_catalog() {
        assert!(decode_products("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_object_body() {
        let err = decode_products(r#"{"products": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_one_bad_entry() {
        let body = r#"[
            { "id": 1, "title": "ok", "price": 1, "description": "d",
              "category": "c", "image": "https://example.com/1.png" },
            { "id": 2, "title": "bad", "price": "free", "description": "d",
              "category": "c", "image": "https://example.com/2.png" }
        ]"#;
        assert!(matches!(
            decode_products(body).unwrap_err(),
            CatalogError::Decode(_)
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let body = r#"[
            { "id": 4, "title": "a", "price": 1, "description": "d",
              "category": "c", "image": "https://example.com/a.png" },
            { "id": 4, "title": "b", "price": 2, "description": "d",
              "category": "c", "image": "https://example.com/b.png" }
        ]"#;
        assert!(matches!(
            decode_products(body).unwrap_err(),
            CatalogError::DuplicateProduct(id) if id == ProductId::new(4)
        ));
    }

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::Status(reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Unexpected status: 502 Bad Gateway");
    }
}
