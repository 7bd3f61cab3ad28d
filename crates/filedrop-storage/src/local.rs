use crate::traits::{BlobReader, Storage, StorageError, StorageResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Local filesystem blob store. Every blob is a plain file directly under `base_path`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating `base_path` if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path.
    ///
    /// Keys are single path components so a key can never escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key == "."
            || storage_key == ".."
            || storage_key.contains('/')
            || storage_key.contains('\\')
            || storage_key.contains('\0')
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key {:?} is not a single path component",
                storage_key
            )));
        }

        Ok(self.base_path.join(storage_key))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn save(&self, storage_key: &str, mut reader: BlobReader) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        // Never overwrite an existing blob
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    StorageError::SaveFailed(format!("Blob {} already exists", storage_key))
                }
                _ => StorageError::SaveFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )),
            })?;

        let written = async {
            let n = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
                format!("Failed to write stream to file {}: {}", path.display(), e)
            })?;
            file.sync_all()
                .await
                .map_err(|e| format!("Failed to sync file {}: {}", path.display(), e))?;
            Ok::<u64, String>(n)
        }
        .await;

        let bytes_copied = match written {
            Ok(n) => n,
            Err(message) => {
                drop(file);
                if let Err(rm_err) = fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %rm_err,
                        "Failed to remove partially written file"
                    );
                }
                return Err(StorageError::SaveFailed(message));
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage save successful"
        );

        Ok(path.display().to_string())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(storage_key.to_string()));
            }
            Err(e) => {
                return Err(StorageError::DeleteFailed(format!(
                    "Failed to delete file {}: {}",
                    path.display(),
                    e
                )));
            }
        }

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn locate(&self, storage_key: &str) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        if !fs::try_exists(&path).await? {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }
        Ok(path.display().to_string())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}
