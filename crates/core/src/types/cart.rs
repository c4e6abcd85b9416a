//! Cart state store.
//!
//! A [`Cart`] is an ordered list of line items, at most one per product.
//! Line items appear in the order their product was first added. Every
//! transition consumes the current cart and returns the next one:
//!
//! ```text
//! absent --add--> 1 --add--> 2 ... --remove--> n-1 ... --remove at 1--> absent
//! ```
//!
//! Removing is always a decrement by one. A line item whose amount would
//! reach zero is dropped instead, so no line item ever carries a zero amount.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// Errors that can occur when rebuilding a [`Cart`] from stored line items.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Two line items refer to the same product.
    #[error("duplicate line item for product {0}")]
    DuplicateLineItem(ProductId),
}

/// One product's entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Product,
    pub amount: NonZeroU32,
}

impl CartLineItem {
    /// A fresh line item with an amount of one.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            amount: NonZeroU32::MIN,
        }
    }

    /// The product ID this line item is keyed by.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times amount.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.amount.get())
    }

    /// `None` when the amount would drop to zero.
    fn decremented(self) -> Option<Self> {
        NonZeroU32::new(self.amount.get() - 1).map(|amount| Self { amount, ..self })
    }
}

/// The visitor's in-progress selection of products and quantities.
///
/// Stored line items are validated on deserialization: a payload with two
/// entries for one product is rejected rather than silently merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line item for the product, or appends a new
    /// line item with an amount of one.
    #[must_use]
    pub fn add_to_cart(self, product: &Product) -> Self {
        let mut items = self.items;
        match items.iter_mut().find(|item| item.product_id() == product.id) {
            Some(item) => item.amount = item.amount.saturating_add(1),
            None => items.push(CartLineItem::new(product.clone())),
        }
        Self { items }
    }

    /// Remove one unit of the product with `product_id`.
    ///
    /// A line item at amount one is dropped; otherwise its amount is
    /// decremented. All other line items keep their order. Removing a product
    /// that is not in the cart returns the cart unchanged.
    #[must_use]
    pub fn remove_from_cart(self, product_id: ProductId) -> Self {
        let items = self
            .items
            .into_iter()
            .filter_map(|item| {
                if item.product_id() == product_id {
                    item.decremented()
                } else {
                    Some(item)
                }
            })
            .collect();
        Self { items }
    }

    /// Sum of all line item amounts. Zero for an empty cart.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |total, item| total.saturating_add(item.amount.get()))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// The line item for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Line items in first-add order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.items.iter()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.product_id()) {
                return Err(CartError::DuplicateLineItem(item.product_id()));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
