// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Work-list traversal from a single seed URL
// - Scope restricted to a URL prefix (literal or path-segment aware)
// - Query/fragment normalization so each page is visited once
// - Optional bounds: page count, depth, whole-run time budget
// - Bounded concurrency with per-host politeness delays
// - Cancellation that keeps the partial result
//
// Submodules:
// - normalize: URL normalization and seed validation
// - scope:     which URLs may be followed
// - state:     visited / discovered / frontier bookkeeping
// - pacer:     per-host delay between fetches
// - queue:     the crawl loop itself
// =============================================================================

mod normalize;
mod pacer;
mod queue;
mod scope;
mod state;

pub use normalize::{normalize_seed, normalize_url};
pub use queue::{crawl_site, CrawlReport, Crawler, PageFailure, StopReason};
pub use scope::Scope;
