//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. The visitor's shell
//! state (cart and drawer flag) lives only here: it is dropped after a
//! period of inactivity, when the store is full and the session is among the
//! least recently used, or when the process restarts.

use std::time::Duration;

use tower_sessions::{Expiry, SessionManagerLayer};

use super::session_store::MokaSessionStore;
use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "stall_session";

/// Session inactivity timeout in seconds (2 hours).
pub const SESSION_EXPIRY_SECONDS: i64 = 2 * 60 * 60;

/// Most sessions held in memory at once.
pub const MAX_SESSIONS: u64 = 100_000;

/// Idle timeout for in-memory session records.
#[must_use]
pub const fn session_idle_timeout() -> Duration {
    Duration::from_secs(SESSION_EXPIRY_SECONDS.unsigned_abs())
}

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaSessionStore> {
    let store = MokaSessionStore::new(MAX_SESSIONS, session_idle_timeout());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
