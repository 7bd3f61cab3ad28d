//! Filedrop Infrastructure Library
//!
//! Shared infrastructure used by the services and the CLI:
//! - TTL cache abstraction with an in-process moka backend
//! - Tracing subscriber initialization

pub mod cache;
pub mod telemetry;

// Re-export commonly used types
pub use cache::{Cache, CacheError, CacheExt, MokaCache};
pub use telemetry::init_telemetry;
