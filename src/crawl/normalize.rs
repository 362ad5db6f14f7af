// src/crawl/normalize.rs
// =============================================================================
// URL normalization used for deduplication.
//
// Two URLs that differ only by their query string or fragment are the same
// page as far as the crawler is concerned, so everything from the first '?'
// or '#' onwards is cut off before a URL is compared, stored or enqueued.
//
// This is deliberately a string operation: it never re-serializes the URL,
// so normalize(normalize(u)) == normalize(u) holds for any input.
// =============================================================================

use url::Url;

use crate::error::CrawlError;

/// Strips the query and fragment suffix from a URL string.
///
/// Examples:
///   "https://example.com/b?x=1"       -> "https://example.com/b"
///   "https://example.com/a#section"   -> "https://example.com/a"
///   "https://example.com/a#s?not-q"   -> "https://example.com/a"
pub fn normalize_url(url: &str) -> &str {
    match url.find(|c: char| c == '#' || c == '?') {
        Some(end) => &url[..end],
        None => url,
    }
}

/// Parses and normalizes the crawl seed.
///
/// The seed must be an absolute http(s) URL; anything else leaves nothing to
/// traverse and is reported as `CrawlError::InvalidSeed`.
pub fn normalize_seed(start_url: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidSeed {
        url: start_url.to_string(),
        reason,
    };

    let mut url = Url::parse(start_url.trim()).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }

    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
