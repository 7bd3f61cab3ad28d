use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use filedrop_core::constants::REAPER_DELETE_CONCURRENCY;
use filedrop_core::AppError;
use filedrop_db::FileRepository;
use filedrop_storage::{Storage, StorageError};

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Files past their expiration date when the sweep started
    pub expired: usize,
    pub blobs_deleted: usize,
    pub blob_failures: usize,
    pub rows_deleted: u64,
    pub batch_failed: bool,
}

/// Periodically removes files whose expiration date has passed.
///
/// A file's metadata row is only removed once its blob is confirmed gone, so a
/// failed blob delete leaves the file for the next sweep.
pub struct ExpiryReaper {
    repository: Arc<dyn FileRepository>,
    storage: Arc<dyn Storage>,
    interval: Duration,
}

impl ExpiryReaper {
    pub fn new(
        repository: Arc<dyn FileRepository>,
        storage: Arc<dyn Storage>,
        interval: Duration,
    ) -> Self {
        Self {
            repository,
            storage,
            interval,
        }
    }

    /// Run sweeps every interval until `shutdown` is cancelled.
    ///
    /// The first sweep happens one interval after start. Cancellation is observed
    /// between sweeps; a sweep in progress always runs to completion.
    pub fn start(self: Arc<Self>, shutdown: CancellationToken) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                interval_secs = self.interval.as_secs_f64(),
                "Expiry reaper started"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        tracing::info!("Expiry reaper shutting down");
                        break;
                    }
                    _ = ticker.tick() => {}
                }

                tracing::info!("Starting scheduled cleanup of expired files");
                if let Err(e) = self.sweep().await {
                    tracing::error!(error = %e, "Expiry sweep failed");
                }
            }
        })
    }

    pub async fn sweep(&self) -> Result<SweepReport, AppError> {
        self.sweep_at(Utc::now()).await
    }

    /// Remove every file that expired before `now`.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "expire_files"))]
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<SweepReport, AppError> {
        let expired = self.repository.get_expired(now).await?;
        let mut report = SweepReport {
            expired: expired.len(),
            ..Default::default()
        };

        if expired.is_empty() {
            tracing::debug!("No expired files");
            return Ok(report);
        }

        let targets: Vec<(Uuid, String)> = expired
            .into_iter()
            .map(|file| (file.id, file.storage_key))
            .collect();
        let storage = self.storage.clone();
        let outcomes: Vec<(Uuid, String, Result<(), StorageError>)> = stream::iter(targets)
            .map(move |(file_id, storage_key)| {
                let storage = storage.clone();
                async move {
                    let result = storage.delete(&storage_key).await;
                    (file_id, storage_key, result)
                }
            })
            .buffer_unordered(REAPER_DELETE_CONCURRENCY)
            .collect()
            .await;

        let mut confirmed = Vec::with_capacity(outcomes.len());
        for (file_id, storage_key, result) in outcomes {
            match result {
                Ok(()) => {
                    report.blobs_deleted += 1;
                    confirmed.push(file_id);
                }
                Err(StorageError::NotFound(_)) => {
                    tracing::warn!(
                        file.id = %file_id,
                        storage_key = %storage_key,
                        "Blob already missing, removing metadata"
                    );
                    confirmed.push(file_id);
                }
                Err(e) => {
                    report.blob_failures += 1;
                    tracing::error!(
                        error = %e,
                        file.id = %file_id,
                        storage_key = %storage_key,
                        "Failed to delete expired blob, keeping metadata for next sweep"
                    );
                }
            }
        }

        if !confirmed.is_empty() {
            match self.repository.delete_batch(&confirmed).await {
                Ok(rows) => report.rows_deleted = rows,
                Err(e) => {
                    report.batch_failed = true;
                    tracing::error!(
                        error = %e,
                        count = confirmed.len(),
                        "Failed to delete expired file metadata"
                    );
                }
            }
        }

        tracing::info!(
            expired = report.expired,
            blobs_deleted = report.blobs_deleted,
            blob_failures = report.blob_failures,
            rows_deleted = report.rows_deleted,
            batch_failed = report.batch_failed,
            "Cleanup completed"
        );

        Ok(report)
    }
}
