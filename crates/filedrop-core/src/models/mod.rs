//! Data models for files, share links and search parameters.

mod file;
mod search;
mod share;

pub use file::*;
pub use search::*;
pub use share::*;
