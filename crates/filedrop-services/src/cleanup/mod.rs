mod service;

pub use service::{ExpiryReaper, SweepReport};
