// src/fetch/http.rs
// =============================================================================
// Fetches pages over HTTP with reqwest.
//
// Key functionality:
// - One shared client (connection pooling) with a per-request timeout
// - Follows redirects (up to 10)
// - Anything other than a 2xx answer is a failure
// - Non-HTML responses (PDFs, images, ...) are refused before the body is read
// - reqwest errors are sorted into PageError variants for diagnostics
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::PageFetcher;
use crate::error::{CrawlError, PageError};

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, PageError> {
        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Status(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html(content_type) {
                return Err(PageError::UnsupportedContent(content_type.to_string()));
            }
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                PageError::Timeout
            } else {
                PageError::Body(e.to_string())
            }
        })
    }
}

// text/html and application/xhtml+xml both carry anchors we can read
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

// Sorts reqwest errors into the failure kinds we report.
fn categorize_error(error: reqwest::Error) -> PageError {
    if error.is_timeout() {
        PageError::Timeout
    } else if error.is_connect() {
        PageError::Connect(error.to_string())
    } else if error.is_redirect() {
        PageError::Other("too many redirects".to_string())
    } else {
        PageError::Other(error.to_string())
    }
}
