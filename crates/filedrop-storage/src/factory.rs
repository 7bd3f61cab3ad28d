use crate::{LocalStorage, Storage, StorageResult};
use filedrop_core::Config;
use std::sync::Arc;

/// Create the blob store described by the configuration.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(&config.storage_path).await?;
    tracing::info!(path = %config.storage_path, "Local blob storage ready");
    Ok(Arc::new(storage))
}
