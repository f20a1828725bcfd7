//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the exporter:
//! - Building the HTTP client with the exporter's user agent
//! - GET requests for pages and assets
//! - Bounded retry with increasing backoff for transient failures
//! - Outcome classification
//!
//! # Retry Logic
//!
//! | Condition            | Action                              |
//! |----------------------|-------------------------------------|
//! | HTTP 2xx HTML        | Success                             |
//! | HTTP 2xx non-HTML    | Immediate failure (not convertible) |
//! | HTTP 429 / 5xx       | Retry up to 3 attempts              |
//! | Transport error      | Retry up to 3 attempts              |
//! | Other non-2xx (404…) | Immediate failure                   |

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// User agent string sent with every request
pub const USER_AGENT: &str = concat!("wikiscribe/", env!("CARGO_PKG_VERSION"));

/// Total attempts per URL, including the first
const MAX_ATTEMPTS: u32 = 3;

/// Base backoff; attempt n waits n times this before retrying
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Result of fetching a page
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched an HTML page
    Html {
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    NotHtml {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Fetch failed after exhausting the retry budget
    Failed {
        /// Error description
        reason: String,
    },
}

/// Builds the HTTP client used for the whole run
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(20))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page URL with retry, classifying the outcome
pub async fn fetch_page(client: &Client, url: &Url) -> FetchOutcome {
    let response = match get_with_retry(client, url).await {
        Ok(response) => response,
        Err(reason) => return FetchOutcome::Failed { reason },
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::Failed {
            reason: format!("HTTP {}", status.as_u16()),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.to_lowercase().contains("html") {
        return FetchOutcome::NotHtml { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Html { body },
        Err(e) => FetchOutcome::Failed {
            reason: format!("Failed to read body: {}", e),
        },
    }
}

/// Fetches an asset URL with retry, returning its raw bytes
///
/// Asset failures are non-fatal by design; this logs and returns None.
pub async fn fetch_asset(client: &Client, url: &Url) -> Option<Vec<u8>> {
    let response = match get_with_retry(client, url).await {
        Ok(response) => response,
        Err(reason) => {
            tracing::warn!("Asset fetch failed for {}: {}", url, reason);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::warn!("Asset fetch failed for {}: HTTP {}", url, response.status().as_u16());
        return None;
    }

    match response.bytes().await {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(e) => {
            tracing::warn!("Asset body read failed for {}: {}", url, e);
            None
        }
    }
}

/// Issues a GET with bounded retry on transport errors and retryable
/// statuses (429, 5xx); other responses are returned to the caller as-is
async fn get_with_retry(client: &Client, url: &Url) -> Result<Response, String> {
    let mut last_error = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        match client.get(url.as_str()).send().await {
            Ok(response) if is_retryable_status(response.status()) => {
                last_error = format!("HTTP {}", response.status().as_u16());
            }
            Ok(response) => return Ok(response),
            Err(e) => {
                last_error = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection failed".to_string()
                } else {
                    e.to_string()
                };
            }
        }

        if attempt < MAX_ATTEMPTS {
            tracing::debug!(
                "Attempt {}/{} for {} failed ({}), backing off",
                attempt,
                MAX_ATTEMPTS,
                url,
                last_error
            );
            tokio::time::sleep(BACKOFF_BASE * attempt).await;
        }
    }

    Err(last_error)
}

/// Statuses worth retrying: rate limiting and server-side errors
fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
