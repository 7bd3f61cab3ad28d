//! Repository trait for file metadata.
//!
//! Services depend on this trait rather than on `PgFileRepository` so that they can
//! be exercised against in-memory doubles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use filedrop_core::models::{File, FileSearchParams, SharedFileUrl};
use filedrop_core::AppError;

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn create(&self, file: &File) -> Result<File, AppError>;

    /// `Ok(None)` when no file has this id.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<File>, AppError>;

    /// All files of one owner, newest first.
    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<File>, AppError>;

    async fn search(
        &self,
        owner_id: Uuid,
        params: &FileSearchParams,
    ) -> Result<Vec<File>, AppError>;

    async fn save_share_link(&self, link: &SharedFileUrl) -> Result<(), AppError>;

    /// Resolve a share token that has not expired at `now`.
    async fn get_share_link(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SharedFileUrl>, AppError>;

    /// Files whose expiration date lies strictly before `now`, oldest expiry first.
    async fn get_expired(&self, now: DateTime<Utc>) -> Result<Vec<File>, AppError>;

    /// Delete every listed file in one statement. Unknown ids are ignored.
    /// Returns the number of rows removed.
    async fn delete_batch(&self, ids: &[Uuid]) -> Result<u64, AppError>;
}
