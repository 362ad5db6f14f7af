// src/loader/mod.rs
// =============================================================================
// Document loading.
//
// Takes the URL list produced by the crawler and turns every page into a
// plain-text Document ready to be chunked and embedded by an indexing
// service. Pages are fetched through the same PageFetcher as the crawl, with
// a bounded number of requests in flight.
//
// A page that cannot be fetched is logged and left out; the remaining
// documents come back in the same order as the input URLs.
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::extract::extract_text;
use crate::fetch::PageFetcher;

/// Text content of one web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Where the text came from; becomes the source URL of retrieved passages.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
}

/// Fetches `urls` and converts each page into a [`Document`].
///
/// `concurrency` is clamped to at least 1.
pub async fn load_documents<F>(fetcher: &F, urls: &[String], concurrency: usize) -> Vec<Document>
where
    F: PageFetcher + ?Sized,
{
    let loaded: Vec<Option<Document>> = stream::iter(urls)
        .map(|url| load_document(fetcher, url))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let documents: Vec<Document> = loaded.into_iter().flatten().collect();
    info!(
        requested = urls.len(),
        loaded = documents.len(),
        "Loaded documents"
    );
    documents
}

async fn load_document<F>(fetcher: &F, url: &str) -> Option<Document>
where
    F: PageFetcher + ?Sized,
{
    match fetcher.fetch(url).await {
        Ok(html) => {
            let page = extract_text(&html);
            Some(Document {
                url: url.to_string(),
                title: page.title,
                text: page.text,
            })
        }
        Err(error) => {
            warn!(%url, %error, "Failed to load document");
            None
        }
    }
}
