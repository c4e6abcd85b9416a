//! Background catalog loader.
//!
//! The app starts immediately with a pending catalog. A background task
//! fetches the catalog once and swaps the result in when it completes. There
//! is no retry and no refresh: a failed fetch stays failed until restart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use pineapple_stall_core::{Product, ProductId};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::CatalogClient;

/// What the rendering layer can observe about the catalog.
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// The fetch has not completed yet.
    #[default]
    Pending,
    /// The fetch succeeded.
    Ready(Arc<[Product]>),
    /// The fetch failed. The cause is logged, not exposed.
    Failed,
}

impl CatalogState {
    /// Look up a product in a ready catalog.
    #[must_use]
    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        match self {
            Self::Ready(products) => products.iter().find(|product| product.id == product_id),
            Self::Pending | Self::Failed => None,
        }
    }
}

/// The shared, once-loaded product catalog.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    client: CatalogClient,
    state: RwLock<CatalogState>,
    started: AtomicBool,
}

impl Catalog {
    /// Create a pending catalog backed by `client`.
    #[must_use]
    pub fn new(client: CatalogClient) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                client,
                state: RwLock::new(CatalogState::Pending),
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CatalogState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Check if the catalog has loaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state(), CatalogState::Ready(_))
    }

    /// Look up a product by ID. `None` unless the catalog is ready.
    #[must_use]
    pub fn find(&self, product_id: ProductId) -> Option<Product> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find(product_id)
            .cloned()
    }

    /// Spawn the background fetch.
    ///
    /// Only the first call spawns a task; later calls return `None`. The task
    /// runs to completion or failure and is not cancelled on shutdown.
    pub fn start_loading(&self) -> Option<JoinHandle<()>> {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return None;
        }

        info!(endpoint = %self.inner.client.endpoint(), "Spawning catalog fetch task");
        let catalog = self.clone();
        Some(tokio::spawn(async move { catalog.load().await }))
    }

    /// Fetch the catalog and publish the result.
    #[instrument(skip_all)]
    async fn load(&self) {
        let next = match self.inner.client.fetch_products().await {
            Ok(products) => {
                info!(count = products.len(), "Catalog is now ready");
                CatalogState::Ready(products.into())
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch catalog");
                CatalogState::Failed
            }
        };
        self.set_state(next);
    }

    pub(crate) fn set_state(&self, state: CatalogState) {
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = state;
    }
}
