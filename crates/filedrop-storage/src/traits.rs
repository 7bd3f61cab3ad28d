//! Storage abstraction trait
//!
//! This module defines the Storage trait that all blob backends must implement.

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

use filedrop_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Save failed: {0}")]
    SaveFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte stream handed to [`Storage::save`]. It is consumed until EOF.
pub type BlobReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Blobs are addressed by an opaque storage key produced by
/// [`crate::keys::generate_storage_key`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist the reader's bytes under `storage_key` and return the stored location.
    async fn save(&self, storage_key: &str, reader: BlobReader) -> StorageResult<String>;

    /// Delete a blob. Deleting a key that does not exist fails with `NotFound`.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Resolve the location of a stored blob, or `NotFound`.
    async fn locate(&self, storage_key: &str) -> StorageResult<String>;

    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
