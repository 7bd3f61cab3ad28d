//! Key/value cache with per-entry TTL.
//!
//! The cache only ever accelerates reads. Callers treat every `CacheError` as a miss
//! (on `get`) or a no-op (on `set`) after logging it.

mod moka_cache;

pub use moka_cache::MokaCache;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

#[async_trait]
pub trait Cache: Send + Sync {
    /// `Ok(None)` on a miss or once the entry's TTL has elapsed.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;
}

/// Typed JSON helpers on top of any [`Cache`].
#[async_trait]
pub trait CacheExt: Cache {
    async fn get_json<T>(&self, key: &str) -> CacheResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> CacheResult<()>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw, ttl).await
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}
