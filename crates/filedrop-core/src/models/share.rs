use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bearer link granting read access to one file until `expires_at`.
///
/// The link references the file by id only. The file may be purged while the
/// link still exists; resolving such a link reports the file as not found.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharedFileUrl {
    pub file_id: Uuid,
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SharedFileUrl {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
