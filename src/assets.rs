//! Asset mirroring
//!
//! Static assets (images) referenced by pages are downloaded at most once
//! per run into an `assets/` subdirectory at the output root. The registry
//! is append-only: a URL that failed once stays failed for the rest of the
//! run, and callers fall back to the original absolute URL. Asset failures
//! never abort the export.

use crate::crawler::fetch_asset;
use crate::output::{sanitize_segment, short_hash, write_file};
use crate::url::in_scope;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use url::Url;

/// Subdirectory under the output root that holds mirrored assets
pub const ASSETS_DIR: &str = "assets";

#[derive(Debug, Clone)]
enum AssetEntry {
    Fetched(PathBuf),
    Failed,
}

/// Registry of mirrored assets with an at-most-one-fetch guarantee
pub struct AssetStore {
    client: Client,
    root: Url,
    enabled: bool,
    registry: HashMap<String, AssetEntry>,
    used_names: HashSet<PathBuf>,
}

impl AssetStore {
    /// Creates a store scoped to the space root
    ///
    /// When `enabled` is false, [`ensure`](Self::ensure) always returns
    /// None and no network requests are made.
    pub fn new(client: Client, root: Url, enabled: bool) -> Self {
        Self {
            client,
            root,
            enabled,
            registry: HashMap::new(),
            used_names: HashSet::new(),
        }
    }

    /// Returns the local path for an asset, downloading it on first use
    ///
    /// The returned path is relative to the output root. Out-of-scope
    /// assets are never mirrored; a previously failed asset returns None
    /// without another network call.
    pub async fn ensure(&mut self, url: &Url, output_dir: &Path) -> Option<PathBuf> {
        if !self.enabled || !in_scope(url, &self.root) {
            return None;
        }

        if let Some(entry) = self.registry.get(url.as_str()) {
            return match entry {
                AssetEntry::Fetched(path) => Some(path.clone()),
                AssetEntry::Failed => None,
            };
        }

        let Some(bytes) = fetch_asset(&self.client, url).await else {
            self.registry
                .insert(url.to_string(), AssetEntry::Failed);
            return None;
        };

        let rel_path = self.assign_name(url);
        match write_file(output_dir, &rel_path, &bytes) {
            Ok(()) => {
                tracing::debug!("Mirrored asset {} -> {}", url, rel_path.display());
                self.registry
                    .insert(url.to_string(), AssetEntry::Fetched(rel_path.clone()));
                Some(rel_path)
            }
            Err(e) => {
                tracing::warn!("Failed to store asset {}: {}", url, e);
                self.registry
                    .insert(url.to_string(), AssetEntry::Failed);
                None
            }
        }
    }

    /// Number of assets mirrored successfully
    pub fn fetched_count(&self) -> usize {
        self.registry
            .values()
            .filter(|e| matches!(e, AssetEntry::Fetched(_)))
            .count()
    }

    /// Number of assets that could not be mirrored
    pub fn failed_count(&self) -> usize {
        self.registry
            .values()
            .filter(|e| matches!(e, AssetEntry::Failed))
            .count()
    }

    /// Picks a collision-free file name under the assets directory
    ///
    /// The name comes from the URL's final path segment; a URL without a
    /// usable basename is named by its hash alone. A name already claimed
    /// by a different URL gets a hash suffix, same policy as page paths.
    fn assign_name(&mut self, url: &Url) -> PathBuf {
        let basename = url
            .path_segments()
            .and_then(|segments| segments.last())
            .filter(|s| !s.is_empty())
            .map(sanitize_segment)
            .unwrap_or_else(|| short_hash(url.as_str()));

        let mut candidate = PathBuf::from(ASSETS_DIR).join(&basename);
        if self.used_names.contains(&candidate) {
            let path = Path::new(&basename);
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("asset");
            let name = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) => format!("{}-{}.{}", stem, short_hash(url.as_str()), ext),
                None => format!("{}-{}", stem, short_hash(url.as_str())),
            };
            candidate = PathBuf::from(ASSETS_DIR).join(name);
        }

        self.used_names.insert(candidate.clone());
        candidate
    }
}
