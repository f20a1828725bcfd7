use crate::UrlError;
use url::Url;

/// Canonicalizes a URL into the identity form used for page de-duplication
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than http/https
/// 3. Lowercase the host
/// 4. Normalize path:
///    - Remove dot segments (. and ..) and duplicate slashes
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
/// 6. Remove query string
///
/// Two URLs differing only by trailing slash, fragment, or query string
/// canonicalize to the same key. Default ports are dropped by the parser.
///
/// # Arguments
///
/// * `url_str` - The URL string to canonicalize
///
/// # Returns
///
/// * `Ok(Url)` - Canonical URL
/// * `Err(UrlError)` - Failed to parse or canonicalize the URL
///
/// # Examples
///
/// ```
/// use wikiscribe::url::canonicalize_url;
///
/// let url = canonicalize_url("https://Site.Example/space/page/#section").unwrap();
/// assert_eq!(url.as_str(), "https://site.example/space/page");
/// ```
pub fn canonicalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if let Some(host) = url.host_str() {
        let normalized_host = host.to_lowercase();
        url.set_host(Some(&normalized_host))
            .map_err(|e| UrlError::Parse(format!("Failed to set host: {}", e)))?;
    } else {
        return Err(UrlError::MissingHost);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);
    url.set_query(None);

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in segments {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            // Parent directory - pop the last segment if possible
            ".." => {
                if !normalized_segments.is_empty() {
                    normalized_segments.pop();
                }
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_trailing_slash() {
        let result = canonicalize_url("https://example.com/page/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = canonicalize_url("https://example.com/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = canonicalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_remove_query() {
        let result = canonicalize_url("https://example.com/page?tab=files&v=2").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_trailing_slash_and_fragment_same_key() {
        let a = canonicalize_url("https://example.com/space/a/").unwrap();
        let b = canonicalize_url("https://example.com/space/a#top").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_lowercase_host() {
        let result = canonicalize_url("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_http_scheme_kept() {
        let result = canonicalize_url("http://127.0.0.1:8080/page").unwrap();
        assert_eq!(result.as_str(), "http://127.0.0.1:8080/page");
    }

    #[test]
    fn test_default_port_dropped() {
        let result = canonicalize_url("https://example.com:443/page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_normalize_path_with_dots() {
        let result = canonicalize_url("https://example.com/a/../b/./c").unwrap();
        assert_eq!(result.as_str(), "https://example.com/b/c");
    }

    #[test]
    fn test_multiple_slashes() {
        let result = canonicalize_url("https://example.com///path//to///page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/path/to/page");
    }

    #[test]
    fn test_parent_directory_at_root() {
        let result = canonicalize_url("https://example.com/../page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = canonicalize_url("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = canonicalize_url("ftp://example.com/page");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        let result = canonicalize_url("not a url");
        assert!(result.is_err());
    }
}
