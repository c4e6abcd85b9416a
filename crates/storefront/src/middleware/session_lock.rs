//! Per-session request serialization.
//!
//! Cart handlers read the visitor's shell state, apply one event and write it
//! back, and the session layer persists the record after the handler returns.
//! Two overlapping requests from one visitor would both start from the same
//! state, so requests carrying the same session cookie run one at a time, from
//! before the session is loaded until after it is saved.
//!
//! Requests without a session cookie belong to a session that does not exist
//! yet and are never serialized.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// One lock per live session cookie.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    /// Create a lock table sized like the session store.
    #[must_use]
    pub fn new(max_sessions: u64, idle_timeout: Duration) -> Self {
        let locks = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle_timeout)
            .build();

        Self { locks }
    }

    /// Wait for exclusive access to the session identified by `session_key`.
    pub async fn lock(&self, session_key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(session_key.to_owned(), async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

/// Middleware that serializes requests sharing a session cookie.
///
/// Must wrap the session layer so the guard outlives the session save.
pub async fn session_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(session_key) = session_cookie(request.headers()) else {
        return next.run(request).await;
    };

    let _guard = state.session_locks().lock(&session_key).await;
    next.run(request).await
}

/// The session cookie's value, if the request carries one.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}
