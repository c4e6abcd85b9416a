//! Pineapple Stall Core - Catalog and cart types.
//!
//! This crate provides the domain types shared by the storefront:
//! - Catalog products as decoded from the remote catalog API
//! - The cart state store (add, remove, totals)
//! - The shell state machine that owns the cart and the drawer flag
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients, no sessions. Every transition takes the current value and
//! returns the next one, so it can be tested without a running server.
//!
//! # Modules
//!
//! - [`types`] - Product, price, cart and shell state types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
