//! PostgreSQL repositories.

mod file;
mod search;

pub use file::{FileRow, PgFileRepository, SharedFileUrlRow};
pub use search::build_search_query;
