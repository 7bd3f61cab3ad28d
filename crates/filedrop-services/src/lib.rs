//! Filedrop Services Layer
//!
//! Business services that coordinate the blob store, the metadata repository and
//! the cache: the file lifecycle service (upload, cached reads, share links) and the
//! background expiry reaper.

pub mod cleanup;
pub mod files;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use cleanup::{ExpiryReaper, SweepReport};
pub use files::FileService;
