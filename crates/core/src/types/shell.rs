//! Shell state machine.
//!
//! The shell is the page chrome around the catalog grid: it owns the cart,
//! the drawer open/closed flag and the item-count badge. Views never touch
//! the cart directly; they emit a [`ShellEvent`] that is applied to the
//! current [`ShellState`].

use serde::{Deserialize, Serialize};

use super::{Cart, Product, ProductId};

/// A user intent raised by the catalog grid, the cart drawer or the badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// "Add to cart" in the grid, or "+" on a line item in the drawer.
    AddToCart(Product),
    /// "-" on a line item in the drawer.
    RemoveFromCart(ProductId),
    OpenCart,
    CloseCart,
}

/// Per-visitor application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellState {
    pub cart: Cart,
    pub drawer_open: bool,
}

impl ShellState {
    /// Apply one event and return the next state.
    #[must_use]
    pub fn apply(self, event: ShellEvent) -> Self {
        match event {
            ShellEvent::AddToCart(product) => Self {
                cart: self.cart.add_to_cart(&product),
                ..self
            },
            ShellEvent::RemoveFromCart(product_id) => Self {
                cart: self.cart.remove_from_cart(product_id),
                ..self
            },
            ShellEvent::OpenCart => Self {
                drawer_open: true,
                ..self
            },
            ShellEvent::CloseCart => Self {
                drawer_open: false,
                ..self
            },
        }
    }

    /// The value shown in the cart badge.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.cart.total_items()
    }
}
