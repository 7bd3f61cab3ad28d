//! File lifecycle service.
//!
//! Coordinates the blob store, the metadata repository and the cache. A blob and its
//! metadata row are written in two steps; when the second step fails the first is
//! undone with a single compensating delete.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use filedrop_core::constants::{file_cache_key, FILE_CACHE_TTL, SHARE_TOKEN_BYTES};
use filedrop_core::models::{File, FileSearchParams, SharedFileUrl};
use filedrop_core::AppError;
use filedrop_db::FileRepository;
use filedrop_infra::{Cache, CacheError, CacheExt};
use filedrop_storage::{generate_storage_key, BlobReader, Storage};

#[derive(Clone)]
pub struct FileService {
    repository: Arc<dyn FileRepository>,
    storage: Arc<dyn Storage>,
    cache: Arc<dyn Cache>,
    share_base_url: String,
}

impl FileService {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        storage: Arc<dyn Storage>,
        cache: Arc<dyn Cache>,
        share_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            storage,
            cache,
            share_base_url: share_base_url.into(),
        }
    }

    /// Store a new file that never expires.
    pub async fn upload(
        &self,
        owner_id: Uuid,
        name: &str,
        content: BlobReader,
        size: i64,
    ) -> Result<File, AppError> {
        self.upload_with_expiry(owner_id, name, content, size, None)
            .await
    }

    /// Store a new file, optionally scheduling it for removal by the expiry reaper.
    #[tracing::instrument(skip(self, content), fields(file.owner_id = %owner_id, file.name = %name, file.size = size))]
    pub async fn upload_with_expiry(
        &self,
        owner_id: Uuid,
        name: &str,
        content: BlobReader,
        size: i64,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<File, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::InvalidInput("File name must not be empty".to_string()));
        }
        if size < 0 {
            return Err(AppError::InvalidInput("File size must not be negative".to_string()));
        }
        if let Some(expires_at) = expires_at {
            if expires_at <= Utc::now() {
                return Err(AppError::InvalidInput(
                    "Expiration date must be in the future".to_string(),
                ));
            }
        }

        let storage_key = generate_storage_key(name);
        let location = self.storage.save(&storage_key, content).await?;

        let file = File::new(owner_id, name, size, storage_key, expires_at);

        match self.repository.create(&file).await {
            Ok(created) => {
                tracing::info!(
                    file.id = %created.id,
                    storage_key = %created.storage_key,
                    location = %location,
                    "File uploaded"
                );
                Ok(created)
            }
            Err(e) => {
                if let Err(cleanup_err) = self.storage.delete(&file.storage_key).await {
                    tracing::error!(
                        error = %cleanup_err,
                        original_error = %e,
                        storage_key = %file.storage_key,
                        "Consistency repair failed: blob stored without metadata"
                    );
                } else {
                    tracing::warn!(
                        error = %e,
                        storage_key = %file.storage_key,
                        "Metadata insert failed, stored blob removed"
                    );
                }
                Err(e)
            }
        }
    }

    /// Fetch file metadata, serving repeated reads from the cache.
    ///
    /// Cache failures are logged and never fail the read.
    #[tracing::instrument(skip(self), fields(file.id = %file_id))]
    pub async fn get_file(&self, file_id: Uuid) -> Result<File, AppError> {
        let cache_key = file_cache_key(file_id);

        let cached: Result<Option<File>, CacheError> = self.cache.get_json(&cache_key).await;
        match cached {
            Ok(Some(file)) => {
                tracing::debug!(cache_key = %cache_key, "File metadata cache hit");
                return Ok(file);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    cache_key = %cache_key,
                    "Cache read failed, falling back to repository"
                );
            }
        }

        let file = self.get_file_uncached(file_id).await?;

        if let Err(e) = self.cache.set_json(&cache_key, &file, FILE_CACHE_TTL).await {
            tracing::warn!(error = %e, cache_key = %cache_key, "Failed to cache file metadata");
        }

        Ok(file)
    }

    /// Fetch file metadata straight from the repository.
    pub async fn get_file_uncached(&self, file_id: Uuid) -> Result<File, AppError> {
        self.repository
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {} not found", file_id)))
    }

    /// Issue a share link for a file owned by `requester_id`, valid for `duration`.
    #[tracing::instrument(skip(self), fields(file.id = %file_id, requester_id = %requester_id))]
    pub async fn share_file(
        &self,
        file_id: Uuid,
        requester_id: Uuid,
        duration: Duration,
    ) -> Result<String, AppError> {
        if duration <= Duration::zero() {
            return Err(AppError::InvalidInput(
                "Share duration must be positive".to_string(),
            ));
        }

        let file = self.get_file_uncached(file_id).await?;
        if file.owner_id != requester_id {
            return Err(AppError::Unauthorized(
                "Only the file owner can share this file".to_string(),
            ));
        }

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(duration)
            .ok_or_else(|| AppError::InvalidInput("Share duration is too large".to_string()))?;

        let token = generate_share_token();
        let url = share_url(&self.share_base_url, &token);
        let link = SharedFileUrl {
            file_id,
            token,
            url: url.clone(),
            expires_at,
            created_at: now,
        };

        self.repository.save_share_link(&link).await?;

        tracing::info!(expires_at = %link.expires_at, "Share link created");
        Ok(url)
    }

    /// Resolve a share token to the file it grants access to.
    #[tracing::instrument(skip(self, token))]
    pub async fn open_share_link(&self, token: &str) -> Result<File, AppError> {
        let link = self
            .repository
            .get_share_link(token, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound("Share link not found or expired".to_string()))?;

        self.get_file(link.file_id).await
    }

    pub async fn search_files(
        &self,
        owner_id: Uuid,
        params: &FileSearchParams,
    ) -> Result<Vec<File>, AppError> {
        params.validate()?;
        self.repository.search(owner_id, params).await
    }

    pub async fn get_files(&self, owner_id: Uuid) -> Result<Vec<File>, AppError> {
        self.repository.get_by_owner(owner_id).await
    }
}

fn generate_share_token() -> String {
    let mut bytes = [0u8; SHARE_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Public URL of a share token under `base_url`.
pub fn share_url(base_url: &str, token: &str) -> String {
    format!("{}/share/{}", base_url.trim_end_matches('/'), token)
}
