//! Shared constants.

use std::time::Duration;

use uuid::Uuid;

/// Prefix of every file metadata entry in the cache.
pub const FILE_CACHE_KEY_PREFIX: &str = "file:";

/// Lifetime of a cached file metadata entry.
pub const FILE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Random bytes in a share token (hex-encoded to twice as many characters).
pub const SHARE_TOKEN_BYTES: usize = 16;

/// Default lifetime of a share link when the caller does not pick one.
pub const DEFAULT_SHARE_DURATION_HOURS: i64 = 24;

/// Blob deletions the reaper keeps in flight at once.
pub const REAPER_DELETE_CONCURRENCY: usize = 8;

pub fn file_cache_key(file_id: Uuid) -> String {
    format!("{}{}", FILE_CACHE_KEY_PREFIX, file_id)
}
