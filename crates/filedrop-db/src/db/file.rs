//! File repository: CRUD for the files and shared_file_urls tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use filedrop_core::models::{File, FileSearchParams, SharedFileUrl};
use filedrop_core::AppError;

use super::search::{build_search_query, FILE_COLUMNS};
use crate::repository::FileRepository;

/// Row type for the files table.
#[derive(Debug, sqlx::FromRow)]
pub struct FileRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub size: i64,
    pub file_type: String,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl FileRow {
    pub fn to_file(self) -> File {
        File {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            size: self.size,
            file_type: self.file_type,
            storage_key: self.storage_key,
            created_at: self.created_at,
            updated_at: self.updated_at,
            expiration_date: self.expiration_date,
        }
    }
}

/// Row type for the shared_file_urls table.
#[derive(Debug, sqlx::FromRow)]
pub struct SharedFileUrlRow {
    pub file_id: Uuid,
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SharedFileUrlRow {
    pub fn to_shared_file_url(self) -> SharedFileUrl {
        SharedFileUrl {
            file_id: self.file_id,
            token: self.token,
            url: self.url,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    #[tracing::instrument(skip(self, file), fields(db.table = "files", db.operation = "insert", file.id = %file.id))]
    async fn create(&self, file: &File) -> Result<File, AppError> {
        let row: FileRow = sqlx::query_as::<Postgres, FileRow>(&format!(
            r#"
            INSERT INTO files (id, owner_id, name, size, file_type, storage_key, created_at, updated_at, expiration_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(file.id)
        .bind(file.owner_id)
        .bind(&file.name)
        .bind(file.size)
        .bind(&file.file_type)
        .bind(&file.storage_key)
        .bind(file.created_at)
        .bind(file.updated_at)
        .bind(file.expiration_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.to_file())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    async fn get_by_id(&self, id: Uuid) -> Result<Option<File>, AppError> {
        let row: Option<FileRow> = sqlx::query_as::<Postgres, FileRow>(&format!(
            "SELECT {} FROM files WHERE id = $1",
            FILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.to_file()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", owner_id = %owner_id))]
    async fn get_by_owner(&self, owner_id: Uuid) -> Result<Vec<File>, AppError> {
        let rows: Vec<FileRow> = sqlx::query_as::<Postgres, FileRow>(&format!(
            "SELECT {} FROM files WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
            FILE_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.to_file()).collect())
    }

    #[tracing::instrument(skip(self, params), fields(db.table = "files", db.operation = "search", owner_id = %owner_id))]
    async fn search(
        &self,
        owner_id: Uuid,
        params: &FileSearchParams,
    ) -> Result<Vec<File>, AppError> {
        let mut qb = build_search_query(owner_id, params);
        let rows: Vec<FileRow> = qb.build_query_as::<FileRow>().fetch_all(&self.pool).await?;

        Ok(rows.into_iter().map(|r| r.to_file()).collect())
    }

    #[tracing::instrument(skip(self, link), fields(db.table = "shared_file_urls", db.operation = "insert", file.id = %link.file_id))]
    async fn save_share_link(&self, link: &SharedFileUrl) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO shared_file_urls (token, file_id, url, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&link.token)
        .bind(link.file_id)
        .bind(&link.url)
        .bind(link.expires_at)
        .bind(link.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, token), fields(db.table = "shared_file_urls", db.operation = "select"))]
    async fn get_share_link(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SharedFileUrl>, AppError> {
        let row: Option<SharedFileUrlRow> = sqlx::query_as::<Postgres, SharedFileUrlRow>(
            r#"
            SELECT file_id, token, url, expires_at, created_at
            FROM shared_file_urls
            WHERE token = $1 AND expires_at > $2
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.to_shared_file_url()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select_expired"))]
    async fn get_expired(&self, now: DateTime<Utc>) -> Result<Vec<File>, AppError> {
        let rows: Vec<FileRow> = sqlx::query_as::<Postgres, FileRow>(&format!(
            r#"
            SELECT {}
            FROM files
            WHERE expiration_date IS NOT NULL AND expiration_date < $1
            ORDER BY expiration_date ASC
            "#,
            FILE_COLUMNS
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.to_file()).collect())
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = "files", db.operation = "delete_batch", count = ids.len()))]
    async fn delete_batch(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM files WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
