// src/lib.rs
// =============================================================================
// scopecrawl: crawl one website inside a URL prefix and turn the pages into
// plain-text documents for a retrieval-augmented QA pipeline.
//
// Modules:
// - crawl:   the scope-bounded crawler (the core of the crate)
// - fetch:   PageFetcher trait, HTTP implementation, retry decorator
// - extract: anchor links and visible text from HTML
// - loader:  URL list -> Documents
// - answer:  typed answers and their fallback / source rendering
//            (see answer::Answer for a usage example)
// - config, error, logging: ambient plumbing
// =============================================================================

pub mod answer;
pub mod config;
pub mod crawl;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod loader;
pub mod logging;

pub use config::{CrawlConfig, FrontierOrder, RetryPolicy, ScopeMode};
pub use crawl::{crawl_site, CrawlReport, Crawler, StopReason};
pub use error::{CrawlError, PageError};
pub use fetch::{build_fetcher, HttpFetcher, PageFetcher, RetryingFetcher};
pub use loader::{load_documents, Document};
