mod service;

pub use service::{share_url, FileService};
