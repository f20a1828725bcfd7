use url::Url;

/// Decides whether a URL belongs to the exported space
///
/// A URL is in scope iff it shares the root URL's origin (scheme, host,
/// port) and its path sits under the root's path prefix with segment
/// alignment: a root of `/docs` covers `/docs` and `/docs/guide`, but not
/// `/docs2`, which merely shares a string prefix.
///
/// Pure predicate; both arguments are expected to be canonical, though a
/// trailing slash on the root path is tolerated.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wikiscribe::url::in_scope;
///
/// let root = Url::parse("https://site.example/docs").unwrap();
/// assert!(in_scope(&Url::parse("https://site.example/docs/guide").unwrap(), &root));
/// assert!(!in_scope(&Url::parse("https://site.example/docs2").unwrap(), &root));
/// assert!(!in_scope(&Url::parse("https://other.example/docs").unwrap(), &root));
/// ```
pub fn in_scope(url: &Url, root: &Url) -> bool {
    if !same_origin(url, root) {
        return false;
    }

    let root_path = root.path().trim_end_matches('/');
    if root_path.is_empty() {
        // Root at the origin's top level covers the whole origin
        return true;
    }

    let path = url.path();
    path == root_path || path.starts_with(&format!("{}/", root_path))
}

/// Returns true if two URLs share scheme, host, and port
fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme() && a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}
