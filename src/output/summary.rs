//! End-of-run summary
//!
//! Per-page and per-asset failures never abort the run; they surface here
//! as counts reported when pass 2 completes.

/// Counters accumulated over one export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pages fetched and converted successfully
    pub pages_fetched: usize,

    /// Pages that exhausted their retry budget or returned non-HTML
    pub pages_failed: usize,

    /// Finalized Markdown files written in pass 2
    pub pages_written: usize,

    /// Assets downloaded and stored locally
    pub assets_fetched: usize,

    /// Assets left as absolute URLs after fetch failures
    pub assets_failed: usize,
}

impl RunSummary {
    /// Creates an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Total pages visited, successful or not
    pub fn pages_visited(&self) -> usize {
        self.pages_fetched + self.pages_failed
    }

    /// Formats the summary as a short human-readable report
    pub fn format(&self) -> String {
        format!(
            "Export complete: {} pages written ({} fetched, {} failed), {} assets mirrored ({} failed)",
            self.pages_written,
            self.pages_fetched,
            self.pages_failed,
            self.assets_fetched,
            self.assets_failed,
        )
    }
}
