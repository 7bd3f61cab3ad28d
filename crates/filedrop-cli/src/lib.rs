//! Wiring shared by the `filedrop` binary.

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use filedrop_core::models::{SortDirection, SortField};
use filedrop_core::{AppError, Config, ErrorMetadata};
use filedrop_db::PgFileRepository;
use filedrop_infra::MokaCache;
use filedrop_services::{ExpiryReaper, FileService};
use std::sync::Arc;

/// Services built from one configuration.
pub struct App {
    pub files: FileService,
    pub reaper: Arc<ExpiryReaper>,
}

/// Connect the database, open blob storage and build the services on top.
pub async fn bootstrap(config: &Config) -> anyhow::Result<App> {
    let pool = filedrop_db::connect(config).await?;
    let storage = filedrop_storage::create_storage(config)
        .await
        .context("Failed to initialize blob storage")?;
    let repository = Arc::new(PgFileRepository::new(pool));
    let cache = Arc::new(MokaCache::new(config.cache_max_capacity));

    let files = FileService::new(
        repository.clone(),
        storage.clone(),
        cache,
        config.share_base_url.clone(),
    );
    let reaper = Arc::new(ExpiryReaper::new(
        repository,
        storage,
        config.reaper_interval(),
    ));

    Ok(App { files, reaper })
}

pub fn parse_sort_field(s: &str) -> Result<SortField, String> {
    s.parse().map_err(|e: AppError| e.client_message())
}

pub fn parse_sort_direction(s: &str) -> Result<SortDirection, String> {
    s.parse().map_err(|e: AppError| e.client_message())
}

/// Expiration time `secs` seconds after `now`.
pub fn expiry_after(now: DateTime<Utc>, secs: i64) -> Result<DateTime<Utc>, AppError> {
    Duration::try_seconds(secs)
        .and_then(|d| now.checked_add_signed(d))
        .ok_or_else(|| {
            AppError::InvalidInput(format!("Expiry of {} seconds is out of range", secs))
        })
}

pub fn share_duration(hours: i64) -> Result<Duration, AppError> {
    Duration::try_hours(hours).ok_or_else(|| {
        AppError::InvalidInput(format!("Share duration of {} hours is out of range", hours))
    })
}

/// JSON body printed for a failed command.
pub fn error_body(err: &anyhow::Error) -> serde_json::Value {
    match err.downcast_ref::<AppError>() {
        Some(app_err) => serde_json::json!({
            "error": app_err.error_code(),
            "message": app_err.client_message(),
            "recoverable": app_err.is_recoverable(),
        }),
        None => serde_json::json!({
            "error": "INTERNAL_ERROR",
            "message": format!("{:#}", err),
        }),
    }
}
