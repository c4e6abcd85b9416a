//! Bounded in-memory session store.
//!
//! Session records live in a `moka` cache keyed by session ID. A record that
//! nobody touches for the idle timeout is evicted, and once the cache is full
//! the least recently used records are evicted first. Records whose own
//! expiry date has passed are dropped when they are next loaded.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};

/// Session store backed by a bounded, idle-evicting cache.
#[derive(Debug, Clone)]
pub struct MokaSessionStore {
    cache: Cache<Id, Record>,
}

impl MokaSessionStore {
    /// Create a store holding at most `max_sessions` records, each evicted
    /// after `idle_timeout` without a read or write.
    #[must_use]
    pub fn new(max_sessions: u64, idle_timeout: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle_timeout)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        // Draw fresh IDs until one is not already taken
        loop {
            let candidate = record.clone();
            let entry = self
                .cache
                .entry(record.id)
                .or_insert_with(async move { candidate })
                .await;
            if entry.is_fresh() {
                return Ok(());
            }
            record.id = Id::default();
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let Some(record) = self.cache.get(session_id).await else {
            return Ok(None);
        };

        if record.expiry_date <= OffsetDateTime::now_utc() {
            self.cache.invalidate(session_id).await;
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}
