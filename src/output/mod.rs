//! Output layer: URL-to-path mapping, file writing, and the run summary

mod paths;
mod summary;
mod writer;

pub use paths::PathMapper;
pub(crate) use paths::{sanitize_segment, short_hash};
pub use summary::RunSummary;
pub use writer::{ensure_dir, write_file};
