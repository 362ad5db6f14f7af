// src/error.rs
// =============================================================================
// Error types for the crawler library.
//
// Two families:
// - CrawlError: something prevents a crawl from starting at all (bad seed,
//   bad configuration, HTTP client could not be built). Fatal.
// - PageError: a single page could not be fetched or read. Never fatal; the
//   crawler logs it, records it in the report and moves on.
//
// The binary wraps both in anyhow for context; the library keeps them typed
// so callers (and the retry decorator) can inspect the variant.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

/// Errors that abort a crawl before traversal begins.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("invalid crawl configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure to fetch or read one page.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PageError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("unsupported content type '{0}'")]
    UnsupportedContent(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl PageError {
    /// Whether another attempt has a reasonable chance of succeeding.
    ///
    /// Only the retry decorator looks at this; the crawl loop treats every
    /// page error the same way.
    pub fn is_transient(&self) -> bool {
        match self {
            PageError::Timeout | PageError::Connect(_) | PageError::Body(_) => true,
            PageError::Status(code) => *code == 429 || (500..600).contains(code),
            PageError::UnsupportedContent(_) | PageError::Other(_) => false,
        }
    }
}
