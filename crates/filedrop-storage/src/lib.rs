//! Filedrop Storage Library
//!
//! Blob storage abstraction and the local filesystem backend.
//!
//! # Storage key format
//!
//! Keys are `{unix_nanos}_{file_name}` with path separators in the name replaced by
//! `_`, so every blob sits directly under the storage root. A key must be a single
//! path component: no separators and never `.` or `..`. Key generation lives in the
//! `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_storage_key;
pub use local::LocalStorage;
pub use traits::{BlobReader, Storage, StorageError, StorageResult};
