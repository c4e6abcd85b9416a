//! Core types for Pineapple Stall.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod shell;

pub use cart::{Cart, CartError, CartLineItem};
pub use id::ProductId;
pub use price::{Price, PriceError};
pub use product::Product;
pub use shell::{ShellEvent, ShellState};
