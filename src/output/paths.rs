//! URL-to-filesystem path mapping
//!
//! Maps every fetched canonical URL to a relative path under the output
//! directory, mirroring the URL hierarchy: each path segment below the
//! space root becomes a directory, the last becomes `<segment>.md`, and
//! the root itself becomes `index.md`. The mapping is a bijection for the
//! lifetime of one run; sanitization collisions are resolved with a short
//! stable hash suffix.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use url::Url;

/// Windows reserved device names that cannot be used as file stems
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Maps canonical URLs to relative output paths, bijectively within a run
pub struct PathMapper {
    root: Url,
    by_url: HashMap<Url, PathBuf>,
    used: HashSet<PathBuf>,
}

impl PathMapper {
    /// Creates a mapper rooted at the space's canonical root URL
    pub fn new(root: Url) -> Self {
        Self {
            root,
            by_url: HashMap::new(),
            used: HashSet::new(),
        }
    }

    /// Assigns (or returns the already-assigned) output path for a URL
    ///
    /// The result is deterministic given the sequence of URLs assigned so
    /// far: a sanitized path already claimed by a different URL gets a
    /// `-<hash>` suffix derived from the full URL, so no two distinct URLs
    /// ever share a path.
    pub fn assign(&mut self, url: &Url) -> PathBuf {
        if let Some(existing) = self.by_url.get(url) {
            return existing.clone();
        }

        let candidate = self.base_path(url);
        let path = if self.used.contains(&candidate) {
            disambiguate(&candidate, url)
        } else {
            candidate
        };

        self.used.insert(path.clone());
        self.by_url.insert(url.clone(), path.clone());
        path
    }

    /// Looks up the assigned path for a URL without assigning one
    pub fn lookup(&self, url: &Url) -> Option<&Path> {
        self.by_url.get(url).map(PathBuf::as_path)
    }

    /// Returns the number of URLs mapped so far
    pub fn len(&self) -> usize {
        self.by_url.len()
    }

    /// Returns true if no URLs have been mapped
    pub fn is_empty(&self) -> bool {
        self.by_url.is_empty()
    }

    /// Computes the un-disambiguated path for a URL
    ///
    /// Strips the root's path prefix, maps every remaining segment to a
    /// directory except the last, which becomes `<segment>.md`. An empty
    /// remainder (the root URL itself) maps to `index.md`.
    fn base_path(&self, url: &Url) -> PathBuf {
        let root_path = self.root.path().trim_end_matches('/');
        let remainder = url.path().strip_prefix(root_path).unwrap_or(url.path());

        let segments: Vec<String> = remainder
            .split('/')
            .filter(|s| !s.is_empty())
            .map(sanitize_segment)
            .collect();

        if segments.is_empty() {
            return PathBuf::from("index.md");
        }

        let mut path = PathBuf::new();
        for dir in &segments[..segments.len() - 1] {
            path.push(dir);
        }
        path.push(format!("{}.md", segments[segments.len() - 1]));
        path
    }
}

/// Appends a short stable hash of the full URL to a colliding path
fn disambiguate(candidate: &Path, url: &Url) -> PathBuf {
    let stem = candidate
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("page");
    let file = format!("{}-{}.md", stem, short_hash(url.as_str()));
    candidate.with_file_name(file)
}

/// Replaces filesystem-illegal characters in a path segment
///
/// Distinct segments may sanitize to the same name; the caller's collision
/// handling restores uniqueness.
pub(crate) fn sanitize_segment(segment: &str) -> String {
    let mut cleaned: String = segment
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "page".to_string();
    }
    if cleaned.chars().count() > 80 {
        cleaned = cleaned.chars().take(80).collect();
    }
    if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(&cleaned)) {
        cleaned.push('_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

/// First 8 hex characters of the SHA-256 of the input
pub(crate) fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..4])
}
