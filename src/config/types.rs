use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Validated configuration for one export run
///
/// Immutable once constructed; every component borrows it for the run's
/// lifetime.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Canonical root URL of the space to export
    pub root_url: Url,

    /// Directory the Markdown tree is written into
    pub output_dir: PathBuf,

    /// Maximum number of pages to crawl; None means unlimited
    pub max_pages: Option<usize>,

    /// Politeness delay between consecutive requests
    pub delay: Duration,

    /// Whether referenced assets are mirrored locally
    pub download_assets: bool,
}
