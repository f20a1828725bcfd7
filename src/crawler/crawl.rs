//! The crawl loop
//!
//! The crawler walks the space as a pull-based, finite sequence: each call
//! to [`Crawler::next_page`] fetches one URL from the frontier, discovers
//! its in-scope links, and returns a page record. The sequence ends when
//! the frontier drains, which the page cap guarantees is finite even on a
//! cyclic page graph.
//!
//! Politeness is a blocking wait: after every fetch the task sleeps for
//! the configured delay before the next request, so no two fetches are
//! ever in flight at once.

use crate::config::ExportConfig;
use crate::content::{parse_page, ContentNode};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::frontier::Frontier;
use crate::state::PageStatus;
use crate::url::{canonicalize_url, in_scope};
use crate::ExportError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// One discovered page, yielded by the crawler
#[derive(Debug)]
pub struct PageRecord {
    /// Canonical URL of the page
    pub url: Url,

    /// Outcome of the fetch
    pub status: PageStatus,

    /// Page title, when the page was fetched
    pub title: Option<String>,

    /// Parsed content tree; empty for failed pages
    pub nodes: Vec<ContentNode>,

    /// In-scope canonical URLs linked from this page
    pub discovered_links: Vec<Url>,

    /// Absolute asset URLs referenced by this page
    pub discovered_assets: Vec<Url>,
}

/// Stateful crawl orchestrator: frontier, fetch loop, delay, page cap
pub struct Crawler {
    client: Client,
    root: Url,
    delay: Duration,
    max_pages: Option<usize>,
    frontier: Frontier,
    visited: usize,
}

impl Crawler {
    /// Creates a crawler seeded with the canonical root URL
    ///
    /// The root is force-enqueued regardless of the page cap, so the root
    /// page is always among the exported pages.
    pub fn new(config: &ExportConfig, root: Url) -> Result<Self, ExportError> {
        let client = build_http_client()?;

        let mut frontier = Frontier::new();
        frontier.enqueue(root.clone());

        Ok(Self {
            client,
            root,
            delay: config.delay,
            max_pages: config.max_pages,
            frontier,
            visited: 0,
        })
    }

    /// The HTTP client, shared with the asset store
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Number of pages fetched (successfully or not) so far
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Number of URLs waiting in the frontier
    pub fn queued(&self) -> usize {
        self.frontier.queued()
    }

    /// Fetches the next frontier URL and returns its page record
    ///
    /// Returns None once the frontier is exhausted. Every returned record
    /// is terminal: either `Fetched` with a parsed content tree, or
    /// `Failed` after the retry budget (or a non-HTML response). Links
    /// discovered on a fetched page are enqueued immediately, gated by the
    /// scope filter and the page cap.
    pub async fn next_page(&mut self) -> Option<PageRecord> {
        let url = self.frontier.pop()?;

        tracing::debug!("Fetching {}", url);
        let outcome = fetch_page(&self.client, &url).await;
        self.visited += 1;

        // Politeness: wait after every fetch, success or failure
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let record = match outcome {
            FetchOutcome::Html { body } => {
                let parsed = parse_page(&body, &url);
                let discovered_links = self.discover(&parsed.links);

                PageRecord {
                    url,
                    status: PageStatus::Fetched,
                    title: parsed.title,
                    nodes: parsed.nodes,
                    discovered_links,
                    discovered_assets: parsed.assets,
                }
            }
            FetchOutcome::NotHtml { content_type } => {
                tracing::warn!("Skipping {} (content-type: {})", url, content_type);
                failed_record(url)
            }
            FetchOutcome::Failed { reason } => {
                tracing::warn!("Failed to fetch {}: {}", url, reason);
                failed_record(url)
            }
        };

        Some(record)
    }

    /// Canonicalizes page links, keeping in-scope ones and enqueueing them
    /// while the page cap allows
    fn discover(&mut self, links: &[Url]) -> Vec<Url> {
        let mut discovered = Vec::new();

        for link in links {
            let canonical = match canonicalize_url(link.as_str()) {
                Ok(canonical) => canonical,
                Err(e) => {
                    tracing::debug!("Ignoring link {}: {}", link, e);
                    continue;
                }
            };

            if !in_scope(&canonical, &self.root) {
                continue;
            }

            if self.under_cap() && self.frontier.enqueue(canonical.clone()) {
                tracing::debug!("Enqueued {}", canonical);
            }

            if !discovered.contains(&canonical) {
                discovered.push(canonical);
            }
        }

        discovered
    }

    /// True while visited + frontier leaves room under the page cap
    fn under_cap(&self) -> bool {
        self.max_pages
            .map_or(true, |cap| self.frontier.seen_count() < cap)
    }
}

fn failed_record(url: Url) -> PageRecord {
    PageRecord {
        url,
        status: PageStatus::Failed,
        title: None,
        nodes: Vec::new(),
        discovered_links: Vec::new(),
        discovered_assets: Vec::new(),
    }
}
