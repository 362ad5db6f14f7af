// src/fetch/retry.rs
// Retry decorator: transient failures (timeouts, connection errors, 429, 5xx)
// are retried with linear backoff; permanent ones are returned immediately.

use async_trait::async_trait;
use tracing::debug;

use super::PageFetcher;
use crate::config::RetryPolicy;
use crate::error::PageError;

#[derive(Debug, Clone)]
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, PageError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    let wait = self.policy.delay_for(attempt);
                    debug!(%url, error = %e, attempt, ?wait, "retrying fetch");
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
