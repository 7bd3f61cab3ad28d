use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one stored file. The bytes live in the blob store under `storage_key`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct File {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub size: i64,
    /// Lowercase extension of `name` without the dot, empty when there is none
    pub file_type: String,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl File {
    /// Build a freshly uploaded file record with a new id.
    pub fn new(
        owner_id: Uuid,
        name: &str,
        size: i64,
        storage_key: String,
        expiration_date: Option<DateTime<Utc>>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.to_string(),
            size,
            file_type: file_type_from_name(name),
            storage_key,
            created_at: now,
            updated_at: now,
            expiration_date,
        }
    }

    /// True once the expiration date lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|exp| exp < now)
    }
}

/// Derive the file type from the characters after the last dot of the final
/// path component.
pub fn file_type_from_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}
