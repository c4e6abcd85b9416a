//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogClient};
use crate::config::StorefrontConfig;
use crate::middleware::SessionLocks;
use crate::middleware::session::{MAX_SESSIONS, session_idle_timeout};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration, the shared product catalog and the per-session request
/// locks. Per-visitor cart state lives in the session, not here.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state with a pending catalog.
    ///
    /// Call [`AppState::start_catalog_loading`] to kick off the fetch.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = Catalog::new(CatalogClient::new(config.catalog_url.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                session_locks: SessionLocks::new(MAX_SESSIONS, session_idle_timeout()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }

    /// Start the one-time catalog fetch in the background.
    pub fn start_catalog_loading(&self) {
        // The handle is dropped; the task keeps running detached.
        let _ = self.inner.catalog.start_loading();
    }
}
