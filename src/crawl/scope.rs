// src/crawl/scope.rs
// =============================================================================
// Decides which URLs the crawler may follow.
//
// A URL is in scope when its string form starts with the allowed prefix. That
// is a literal string comparison, not a URL/path comparison, so the prefix
// "https://example.com/foo" also admits "https://example.com/foobar".
// ScopeMode::PathSegment tightens this: the prefix must then end exactly on
// a path-segment boundary of the candidate URL.
//
// Candidate URLs come out of url::Url serialization (lowercase host,
// percent-encoded path), so the prefix is brought into the same form first.
// =============================================================================

use url::Url;

use crate::config::ScopeMode;

/// Rewrites an http(s) prefix into the form `Url` serializes links in.
///
/// A prefix that does not parse is returned unchanged. When the prefix stops
/// right after the host, the `/` that `Url` appends is not added, so the
/// prefix still matches literally.
pub fn canonical_prefix(prefix: &str) -> String {
    let Ok(url) = Url::parse(prefix) else {
        return prefix.to_string();
    };
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return prefix.to_string();
    }

    let serialized = url.as_str();
    let bare_host = url.path() == "/" && url.query().is_none() && url.fragment().is_none();
    if bare_host && !prefix.ends_with('/') {
        if let Some(trimmed) = serialized.strip_suffix('/') {
            return trimmed.to_string();
        }
    }
    serialized.to_string()
}

#[derive(Debug, Clone)]
pub struct Scope {
    prefix: String,
    mode: ScopeMode,
}

impl Scope {
    pub fn new(prefix: impl Into<String>, mode: ScopeMode) -> Self {
        Self {
            prefix: prefix.into(),
            mode,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn contains(&self, url: &str) -> bool {
        let Some(rest) = url.strip_prefix(self.prefix.as_str()) else {
            return false;
        };

        match self.mode {
            ScopeMode::Prefix => true,
            ScopeMode::PathSegment => {
                self.prefix.ends_with('/')
                    || rest.is_empty()
                    || rest.starts_with(|c: char| c == '/' || c == '?' || c == '#')
            }
        }
    }
}
