//! Wikiscribe: a wiki-space Markdown exporter
//!
//! This crate crawls every page of a public documentation space reachable
//! from a root URL, converts each page to Markdown (preserving headings,
//! code blocks, and mermaid diagrams), rewrites intra-space links so the
//! exported tree is browsable offline, and optionally mirrors static assets.

pub mod assets;
pub mod config;
pub mod content;
pub mod crawler;
pub mod export;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for wikiscribe operations
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid root URL: {0}")]
    InvalidUrl(String),

    #[error("Output directory error: {0}")]
    OutputDir(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for wikiscribe operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::ExportConfig;
pub use export::Exporter;
pub use state::PageStatus;
pub use url::{canonicalize_url, in_scope};
