//! Session-related types.
//!
//! The visitor's [`ShellState`](pineapple_stall_core::ShellState) is stored
//! as a single JSON value under [`keys::SHELL_STATE`].

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's cart and drawer state.
    pub const SHELL_STATE: &str = "shell_state";
}
