//! Mock blob storage for testing

use async_trait::async_trait;
use filedrop_storage::{BlobReader, Storage, StorageError, StorageResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncReadExt;

#[derive(Clone, Default)]
pub struct MockStorage {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failing_deletes: Arc<Mutex<HashSet<String>>>,
    delete_calls: Arc<Mutex<Vec<String>>>,
    fail_saves: Arc<AtomicBool>,
    fail_all_deletes: Arc<AtomicBool>,
    delete_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, data: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    pub fn data(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn fail_all_deletes(&self) {
        self.fail_all_deletes.store(true, Ordering::SeqCst);
    }

    /// Make every delete of `key` fail with a backend error.
    pub fn fail_delete_of(&self, key: &str) {
        self.failing_deletes.lock().unwrap().insert(key.to_string());
    }

    pub fn set_delete_delay(&self, delay: Duration) {
        *self.delete_delay.lock().unwrap() = Some(delay);
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn save(&self, storage_key: &str, mut reader: BlobReader) -> StorageResult<String> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::SaveFailed("mock save failure".to_string()));
        }

        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        self.insert(storage_key, &data);
        Ok(format!("mem://{}", storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.delete_calls
            .lock()
            .unwrap()
            .push(storage_key.to_string());

        let delay = *self.delete_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_all_deletes.load(Ordering::SeqCst)
            || self.failing_deletes.lock().unwrap().contains(storage_key)
        {
            return Err(StorageError::DeleteFailed(format!(
                "mock delete failure for {}",
                storage_key
            )));
        }

        match self.blobs.lock().unwrap().remove(storage_key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(storage_key.to_string())),
        }
    }

    async fn locate(&self, storage_key: &str) -> StorageResult<String> {
        if self.contains(storage_key) {
            Ok(format!("mem://{}", storage_key))
        } else {
            Err(StorageError::NotFound(storage_key.to_string()))
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.contains(storage_key))
    }
}
