//! Duplicate-notification suppression keyed by upstream event id.
//!
//! The store is the only long-lived mutable state in the pipeline. An id
//! present in the store was marked seen strictly before now. Absence means
//! never-seen or retention elapsed; the store cannot distinguish the two,
//! which is what bounds its memory.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;

/// Seam for the dedup backend. `check_and_mark` must be linearizable per
/// id: two concurrent calls for the same id must not both return `true`.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Atomically: if `id` is marked seen and unexpired, return `false`;
    /// otherwise mark it seen until now + `ttl` and return `true`.
    async fn check_and_mark(&self, id: &str, ttl: Duration) -> Result<bool, StoreError>;
}

/// In-process TTL map. Dedup history does not survive a restart; a durable
/// key-value backend can be slotted in behind [`DedupStore`] instead.
#[derive(Debug, Default)]
pub struct MemoryDedupStore {
    entries: Mutex<HashMap<String, Instant>>,
}

impl MemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock-injected core of `check_and_mark`; tests drive `now` directly.
    /// Expired entries are purged on every call, which keeps the map
    /// bounded by the number of distinct ids seen within one TTL window.
    pub async fn check_and_mark_at(&self, id: &str, ttl: Duration, now: Instant) -> bool {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, expires_at| *expires_at > now);
        if entries.contains_key(id) {
            return false;
        }
        entries.insert(id.to_string(), now + ttl);
        true
    }

    /// Number of unexpired ids currently tracked (as of the last purge).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl DedupStore for MemoryDedupStore {
    async fn check_and_mark(&self, id: &str, ttl: Duration) -> Result<bool, StoreError> {
        Ok(self.check_and_mark_at(id, ttl, Instant::now()).await)
    }
}
