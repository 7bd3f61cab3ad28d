//! In-memory doubles for the storage, repository and cache seams.
//!
//! No database or filesystem is needed, and each double can be told to fail so the
//! consistency paths of the services can be exercised.

pub mod mock_cache;
pub mod mock_repositories;
pub mod mock_storage;

pub use mock_cache::MockCache;
pub use mock_repositories::MockFileRepository;
pub use mock_storage::MockStorage;

use filedrop_storage::BlobReader;

pub fn reader(data: &[u8]) -> BlobReader {
    Box::pin(std::io::Cursor::new(data.to_vec()))
}
