//! Mock cache for testing

use async_trait::async_trait;
use filedrop_infra::cache::{Cache, CacheError, CacheResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every write with its TTL. Entries never expire on their own.
#[derive(Clone, Default)]
pub struct MockCache {
    entries: Arc<Mutex<HashMap<String, (String, Duration)>>>,
    fail_gets: Arc<AtomicBool>,
    fail_sets: Arc<AtomicBool>,
    get_calls: Arc<AtomicUsize>,
    set_calls: Arc<AtomicUsize>,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), Duration::from_secs(60)));
    }

    pub fn entry(&self, key: &str) -> Option<(String, Duration)> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn fail_gets(&self) {
        self.fail_gets.store(true, Ordering::SeqCst);
    }

    pub fn fail_sets(&self) {
        self.fail_sets.store(true, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("mock cache unavailable".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sets.load(Ordering::SeqCst) {
            return Err(CacheError::Backend("mock cache unavailable".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, ttl));
        Ok(())
    }
}
