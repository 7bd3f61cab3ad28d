use async_trait::async_trait;
use moka::future::Cache as MokaFutureCache;
use moka::Expiry;
use std::time::{Duration, Instant};

use super::{Cache, CacheResult};

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Each entry expires after the TTL it was inserted with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process cache backed by moka.
#[derive(Clone)]
pub struct MokaCache {
    inner: MokaFutureCache<String, Entry>,
}

impl MokaCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = MokaFutureCache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

#[async_trait]
impl Cache for MokaCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.inner.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        self.inner.insert(key.to_string(), Entry { value, ttl }).await;
        Ok(())
    }
}
