//! Filedrop Database Library
//!
//! PostgreSQL persistence for file metadata and share links, plus pool setup and
//! embedded migrations.

pub mod db;
pub mod repository;
pub mod setup;

pub use db::{build_search_query, FileRow, PgFileRepository, SharedFileUrlRow};
pub use repository::FileRepository;
pub use setup::{connect, run_migrations};
