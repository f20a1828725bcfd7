//! Export orchestrator
//!
//! The orchestrator drives two passes over the discovered page set. Pass 1
//! crawls the space to exhaustion, assigning each fetched page its output
//! path immediately and rendering a draft body; links whose targets are
//! not yet in the path map are drafted as pending tokens. Pass 2 runs with
//! the complete URL-to-path map in hand: every pending token is replaced
//! with the final relative link, or degraded back to the original absolute
//! URL when its target failed or was never crawled, and the finalized
//! bytes are written to disk.
//!
//! Two passes are required because pages may link forward to pages not yet
//! discovered; a single pass cannot know a forward target's final relative
//! path at conversion time.

use crate::assets::AssetStore;
use crate::content::{render_page, LinkTarget};
use crate::crawler::Crawler;
use crate::output::{write_file, PathMapper, RunSummary};
use crate::url::{canonicalize_url, in_scope};
use crate::{ExportConfig, PageStatus, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// A link whose destination was unknown when its page was drafted
#[derive(Debug)]
struct PendingLink {
    /// Canonical URL of the in-scope target
    target: Url,

    /// The href as written on the page, kept for graceful degradation
    original: String,
}

/// A fetched page between pass 1 and pass 2
#[derive(Debug)]
struct DraftPage {
    output_path: PathBuf,
    body: String,
    pending: Vec<PendingLink>,
}

/// Drives one export run over a configured space
pub struct Exporter {
    config: ExportConfig,
    root: Url,
}

impl Exporter {
    /// Creates an exporter for a validated configuration
    pub fn new(config: ExportConfig) -> Result<Self> {
        let root = canonicalize_url(config.root_url.as_str())?;
        Ok(Self { config, root })
    }

    /// Runs both passes and returns the end-of-run summary
    ///
    /// Per-page and per-asset failures are recovered and counted; only
    /// errors that prevent writing the output tree propagate.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!(
            "Exporting {} into {}",
            self.root,
            self.config.output_dir.display()
        );

        let mut summary = RunSummary::new();
        let mut mapper = PathMapper::new(self.root.clone());
        let mut crawler = Crawler::new(&self.config, self.root.clone())?;
        let mut assets = AssetStore::new(
            crawler.client().clone(),
            self.root.clone(),
            self.config.download_assets,
        );

        // Pass 1: crawl to exhaustion, drafting each page as it arrives
        let mut drafts: Vec<DraftPage> = Vec::new();
        while let Some(record) = crawler.next_page().await {
            match record.status {
                PageStatus::Fetched => {
                    let output_path = mapper.assign(&record.url);

                    let mut asset_paths: HashMap<String, PathBuf> = HashMap::new();
                    for asset in &record.discovered_assets {
                        if let Some(local) = assets.ensure(asset, &self.config.output_dir).await {
                            asset_paths.insert(asset.to_string(), local);
                        }
                    }

                    let mut pending: Vec<PendingLink> = Vec::new();
                    let body = self.draft_body(
                        &record.title,
                        &record.nodes,
                        &output_path,
                        &mapper,
                        &asset_paths,
                        &mut pending,
                    );

                    summary.pages_fetched += 1;
                    drafts.push(DraftPage {
                        output_path,
                        body,
                        pending,
                    });
                }
                PageStatus::Failed | PageStatus::Pending => {
                    summary.pages_failed += 1;
                }
            }

            if crawler.visited() % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} queued",
                    crawler.visited(),
                    crawler.queued()
                );
            }
        }

        tracing::info!(
            "Crawl finished: {} pages fetched, {} failed; finalizing links",
            summary.pages_fetched,
            summary.pages_failed
        );

        // Pass 2: resolve pending links against the complete path map
        for draft in &mut drafts {
            for (index, link) in draft.pending.iter().enumerate() {
                let destination = match mapper.lookup(&link.target) {
                    Some(target_path) => relative_to(&draft.output_path, target_path)
                        .unwrap_or_else(|| link.original.clone()),
                    // Failed or never-crawled target: keep the absolute URL
                    None => link.original.clone(),
                };

                let token = format!("({})", pending_token(index));
                draft.body = draft.body.replace(&token, &format!("({})", destination));
            }

            write_file(
                &self.config.output_dir,
                &draft.output_path,
                draft.body.as_bytes(),
            )?;
            summary.pages_written += 1;
        }

        summary.assets_fetched = assets.fetched_count();
        summary.assets_failed = assets.failed_count();

        tracing::info!("{}", summary.format());
        Ok(summary)
    }

    /// Renders a page's draft body with the provisional link resolver
    ///
    /// Targets already in the path map get their final relative link right
    /// away; unknown in-scope targets are recorded as pending references.
    fn draft_body(
        &self,
        title: &Option<String>,
        nodes: &[crate::content::ContentNode],
        output_path: &Path,
        mapper: &PathMapper,
        asset_paths: &HashMap<String, PathBuf>,
        pending: &mut Vec<PendingLink>,
    ) -> String {
        let root = &self.root;

        let mut resolve_link = |href: &str| -> LinkTarget {
            match canonicalize_url(href) {
                Ok(canonical) if in_scope(&canonical, root) => {
                    if let Some(target_path) = mapper.lookup(&canonical) {
                        match relative_to(output_path, target_path) {
                            Some(rel) => LinkTarget::Relative(rel),
                            None => LinkTarget::External(href.to_string()),
                        }
                    } else {
                        let token = pending_token(pending.len());
                        pending.push(PendingLink {
                            target: canonical,
                            original: href.to_string(),
                        });
                        LinkTarget::Pending(token)
                    }
                }
                _ => LinkTarget::External(href.to_string()),
            }
        };

        let mut resolve_asset = |src: &str| -> Option<String> {
            asset_paths
                .get(src)
                .and_then(|local| relative_to(output_path, local))
        };

        render_page(title.as_deref(), nodes, &mut resolve_link, &mut resolve_asset)
    }
}

/// The reserved placeholder destination for pending reference `index`
///
/// The scheme prefix cannot occur in wiki content, and each token is
/// scoped to its own page's pending table.
fn pending_token(index: usize) -> String {
    format!("wikiscribe:pending:{}", index)
}

/// Computes the relative path from a page file to a target file
///
/// Both paths are relative to the output root; the result is relative to
/// the page's directory, which is what a Markdown link needs.
fn relative_to(from_page: &Path, target: &Path) -> Option<String> {
    let from_dir = from_page.parent().unwrap_or_else(|| Path::new(""));
    pathdiff::diff_paths(target, from_dir).map(|p| p.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to_sibling() {
        assert_eq!(
            relative_to(Path::new("index.md"), Path::new("a.md")),
            Some("a.md".to_string())
        );
    }

    #[test]
    fn test_relative_to_subdirectory() {
        assert_eq!(
            relative_to(Path::new("index.md"), Path::new("guide/setup.md")),
            Some("guide/setup.md".to_string())
        );
    }

    #[test]
    fn test_relative_to_parent() {
        assert_eq!(
            relative_to(Path::new("guide/setup.md"), Path::new("index.md")),
            Some("../index.md".to_string())
        );
    }

    #[test]
    fn test_relative_to_across_branches() {
        assert_eq!(
            relative_to(Path::new("blog/post.md"), Path::new("docs/guide.md")),
            Some("../docs/guide.md".to_string())
        );
    }

    #[test]
    fn test_relative_to_is_idempotent() {
        let first = relative_to(Path::new("a/b.md"), Path::new("c/d.md"));
        let second = relative_to(Path::new("a/b.md"), Path::new("c/d.md"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_pending_token_format() {
        assert_eq!(pending_token(0), "wikiscribe:pending:0");
        assert_eq!(pending_token(12), "wikiscribe:pending:12");
    }
}
