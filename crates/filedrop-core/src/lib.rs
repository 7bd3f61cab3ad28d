//! Filedrop Core Library
//!
//! Domain models, error types, configuration and shared constants used by every
//! Filedrop crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
