// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Everything the crawler needs is passed in through one explicit value at
// construction time; nothing is read from globals. The CLI (src/cli.rs) maps
// its flags onto this struct, and tests build it directly.
// =============================================================================

use std::time::Duration;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::CrawlError;

/// How `allowed_prefix` decides whether a URL is in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMode {
    /// Plain string prefix: `https://example.com/foo` also admits
    /// `https://example.com/foobar`.
    #[default]
    Prefix,
    /// The prefix must end on a path-segment boundary of the URL.
    PathSegment,
}

/// Which end of the frontier the next URL is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrontierOrder {
    /// Stack discipline (depth-first flavoured).
    #[default]
    Lifo,
    /// Queue discipline (breadth-first). Gives shortest-path depths, which
    /// matters when `max_depth` is set.
    Fifo,
}

/// Retry behaviour for transient page failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one. Zero disables retries.
    pub max_retries: u32,
    /// Base delay; attempt `n` waits `backoff * n`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("scopecrawl/", env!("CARGO_PKG_VERSION"));

/// Settings for a single crawl invocation.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub start_url: String,
    pub allowed_prefix: String,
    pub scope_mode: ScopeMode,
    pub request_timeout: Duration,
    /// Minimum spacing between two fetches to the same host.
    pub delay: Option<Duration>,
    pub frontier_order: FrontierOrder,
    /// Upper bound on the number of discovered URLs.
    pub max_pages: Option<usize>,
    /// Upper bound on link hops from the seed (seed = 0).
    pub max_depth: Option<usize>,
    /// Fetches allowed in flight at once. 1 = strictly sequential.
    pub concurrency: usize,
    pub retry: RetryPolicy,
    /// Budget for the whole run; the partial result is returned when it runs out.
    pub crawl_timeout: Option<Duration>,
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn new(start_url: impl Into<String>, allowed_prefix: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            allowed_prefix: allowed_prefix.into(),
            scope_mode: ScopeMode::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            delay: None,
            frontier_order: FrontierOrder::default(),
            max_pages: None,
            max_depth: None,
            concurrency: 1,
            retry: RetryPolicy::default(),
            crawl_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Checks the settings that cannot be fixed up silently.
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.allowed_prefix.is_empty() {
            return Err(CrawlError::InvalidConfig(
                "allowed prefix must not be empty".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(CrawlError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.max_pages == Some(0) {
            return Err(CrawlError::InvalidConfig(
                "max pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
