// src/fetch/mod.rs
// =============================================================================
// The Page Fetcher boundary.
//
// The crawler and the document loader never talk to the network directly;
// they go through the PageFetcher trait. That keeps the traversal logic
// testable with an in-memory fake and lets retry behaviour be layered on as
// a decorator.
//
// Submodules:
// - http:  reqwest-backed fetcher used in production
// - retry: wraps any fetcher and retries transient failures
// =============================================================================

mod http;
mod retry;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CrawlConfig;
use crate::error::{CrawlError, PageError};

pub use http::HttpFetcher;
pub use retry::RetryingFetcher;

/// Fetches the HTML body of a page.
///
/// Implementations report every kind of failure (timeout, connection error,
/// non-success status, unusable body) as a `PageError`; callers treat them
/// all the same way.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, PageError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, PageError> {
        (**self).fetch(url).await
    }
}

/// Builds the production fetcher stack described by `config`: an HTTP
/// fetcher with the configured timeout, wrapped in the retry policy.
pub fn build_fetcher(config: &CrawlConfig) -> Result<RetryingFetcher<HttpFetcher>, CrawlError> {
    let http = HttpFetcher::new(config.request_timeout, &config.user_agent)?;
    Ok(RetryingFetcher::new(http, config.retry))
}
