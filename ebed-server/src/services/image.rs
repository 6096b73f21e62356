//! Image URL resolution
//!
//! Stored image references are either absolute URLs or paths relative to
//! the configured CDN endpoint.

/// Join a CDN path onto the endpoint; absolute http(s) URLs pass through
pub fn resolve_image_url(endpoint: &str, path: &str) -> String {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") || endpoint.is_empty() {
        return path.to_string();
    }
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
