//! Short-TTL key/value cache.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

/// Key/value cache with per-entry TTL.
///
/// Writes are best effort: the engine logs and continues when a cache
/// write fails, and every miss falls through to the execution store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a value, `None` on miss or expiry.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Store a value for `ttl`.
    async fn set(&self, key: &str, value: Value, ttl: Duration);

    /// Drop a value.
    async fn delete(&self, key: &str);
}

#[derive(Clone)]
struct CacheEntry {
    value: Value,
    ttl: Duration,
}

struct PerEntryTtl;

impl moka::Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process cache backed by a moka future cache.
pub struct MemoryCache {
    inner: moka::future::Cache<String, CacheEntry>,
}

impl MemoryCache {
    /// Create a cache bounded to `capacity` entries.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: moka::future::Cache::builder()
                .max_capacity(capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key).await.map(|entry| entry.value)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) {
        self.inner
            .insert(key.to_owned(), CacheEntry { value, ttl })
            .await;
    }

    async fn delete(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}
