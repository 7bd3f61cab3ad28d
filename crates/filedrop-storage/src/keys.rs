//! Storage key generation.
//!
//! Key format: `{unix_nanos}_{file_name}`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a storage key for an uploaded file name.
///
/// Path separators in the name are replaced by `_` so the key never names a
/// nested path. The display name kept on the file record is not affected.
pub fn generate_storage_key(file_name: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    storage_key_at(nanos, file_name)
}

pub(crate) fn storage_key_at(nanos: u128, file_name: &str) -> String {
    let sanitized: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}_{}", nanos, sanitized)
}
