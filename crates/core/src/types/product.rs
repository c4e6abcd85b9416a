//! Catalog product type.

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Price, ProductId};

/// A product as published by the remote catalog.
///
/// Products are read-only: they are decoded from the catalog response and
/// never created or mutated locally. Decoding is strict about shape - a
/// missing field, a non-numeric price, a negative price, or an image that is
/// not an absolute URL fails the decode. Unknown fields (such as ratings) are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog-assigned identifier, unique within the catalog.
    pub id: ProductId,
    pub category: String,
    pub description: String,
    /// Absolute URL of the product image.
    pub image: Url,
    pub price: Price,
    pub title: String,
}
