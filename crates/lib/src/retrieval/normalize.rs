//! URL normalisation for deduplication.

use url::Url;

/// The dedup key of a URL: lowercase host and path, `http` folded into
/// `https`, no trailing slash, query or fragment.
///
/// The key is only used for comparison; sources keep their original URL.
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(url) if url.host_str().is_some() => {
            let scheme = match url.scheme() {
                "http" => "https",
                other => other,
            };
            let host = url.host_str().unwrap_or_default().to_lowercase();
            let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
            let path = url.path().trim_end_matches('/').to_lowercase();
            format!("{scheme}://{host}{port}{path}")
        }
        _ => raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_lowercase(),
    }
}
