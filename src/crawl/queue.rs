// src/crawl/queue.rs
// =============================================================================
// Scope-bounded crawling.
//
// How it works:
// 1. Start with the (normalized) seed URL in the frontier
// 2. Take a URL off the frontier and mark it visited
// 3. Fetch the page HTML through the PageFetcher
// 4. Extract every anchor, resolve it against the page URL, drop ?query/#frag
// 5. Record in-scope links that were neither visited nor seen before
// 6. Repeat until the frontier is empty (or a bound / cancellation hits)
//
// The result is the set of in-scope URLs discovered along the way. A page
// that fails to load is logged and counted; it simply contributes no links.
//
// Concurrency:
// - The loop below is the only owner of the crawl state, so no locking
// - Up to `concurrency` fetches run at once in a FuturesUnordered
// - With concurrency = 1 the crawl is strictly sequential
// - Politeness delays are applied per host by HostPacer
//
// Stopping early:
// - CancellationToken or the crawl_timeout budget drop the in-flight fetches
//   and return what has been discovered so far (always a consistent subset)
// - max_pages stops the crawl as soon as that many URLs have been discovered;
//   fetches still in flight are dropped, since nothing more can be recorded
// =============================================================================

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::normalize::{normalize_seed, normalize_url};
use super::pacer::HostPacer;
use super::scope::{canonical_prefix, Scope};
use super::state::{CrawlState, FrontierEntry};
use crate::config::CrawlConfig;
use crate::error::{CrawlError, PageError};
use crate::extract::extract_anchor_links;
use crate::fetch::{build_fetcher, PageFetcher};

/// Why the crawl loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every reachable in-scope URL has been processed.
    Exhausted,
    /// `max_pages` URLs have been discovered.
    PageLimit,
    Cancelled,
    /// The `crawl_timeout` budget ran out.
    TimedOut,
}

/// A page that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub url: String,
    pub error: PageError,
}

/// Outcome of one crawl.
///
/// `urls` is the crawl result proper. The other fields are diagnostics, e.g.
/// to tell "nothing in scope" apart from "every fetch failed".
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    pub allowed_prefix: String,
    /// Discovered in-scope URLs, sorted, without duplicates.
    pub urls: Vec<String>,
    /// Number of URLs taken off the frontier (seed included).
    pub visited: usize,
    pub failures: Vec<PageFailure>,
    pub stop: StopReason,
}

impl CrawlReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.stop == StopReason::Exhausted
    }
}

/// Crawls one site, restricted to a URL prefix.
///
/// A `Crawler` holds only configuration; every call to [`Crawler::run`]
/// starts from empty state, so it can be reused for independent crawls.
pub struct Crawler<F> {
    config: CrawlConfig,
    seed: Url,
    scope: Scope,
    fetcher: F,
    pacer: HostPacer,
}

impl<F: PageFetcher> Crawler<F> {
    /// Validates the configuration and seed. Fails with `InvalidSeed` or
    /// `InvalidConfig`; nothing is fetched yet.
    pub fn new(config: CrawlConfig, fetcher: F) -> Result<Self, CrawlError> {
        config.validate()?;
        let seed = normalize_seed(&config.start_url)?;
        let prefix = canonical_prefix(&config.allowed_prefix);
        if prefix != config.allowed_prefix {
            warn!(
                given = %config.allowed_prefix,
                using = %prefix,
                "Allowed prefix rewritten to canonical URL form"
            );
        }
        let scope = Scope::new(prefix, config.scope_mode);
        let pacer = HostPacer::new(config.delay);

        Ok(Self {
            config,
            seed,
            scope,
            fetcher,
            pacer,
        })
    }

    pub async fn run(&self) -> CrawlReport {
        self.run_until_cancelled(CancellationToken::new()).await
    }

    /// Runs the crawl until the frontier is exhausted, a bound is hit, the
    /// budget runs out or `cancel` fires. Individual page failures never end
    /// the crawl.
    pub async fn run_until_cancelled(&self, cancel: CancellationToken) -> CrawlReport {
        let mut state = CrawlState::new(self.seed.to_string(), self.config.frontier_order);
        let mut failures = Vec::new();
        let mut in_flight = FuturesUnordered::new();
        let mut stop = StopReason::Exhausted;

        let budget = self.config.crawl_timeout;
        let deadline = async move {
            match budget {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        info!(seed = %self.seed, "Starting crawl");
        info!(prefix = %self.scope.prefix(), "Only accepting links starting with prefix");

        loop {
            // Fill up to the concurrency limit
            while in_flight.len() < self.config.concurrency {
                let Some(entry) = state.next() else {
                    break;
                };
                if self.at_depth_limit(entry.depth) {
                    debug!(url = %entry.url, depth = entry.depth, "Depth limit reached, not expanding");
                    continue;
                }
                in_flight.push(self.visit(entry));
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    warn!(in_flight = in_flight.len(), "Crawl cancelled");
                    stop = StopReason::Cancelled;
                    break;
                }
                _ = &mut deadline => {
                    warn!(in_flight = in_flight.len(), "Crawl budget exhausted");
                    stop = StopReason::TimedOut;
                    break;
                }
                Some((entry, result)) = in_flight.next() => match result {
                    Ok(html) => {
                        if self.expand(&mut state, &entry, &html) {
                            info!(max_pages = ?self.config.max_pages, "Page limit reached");
                            stop = StopReason::PageLimit;
                            break;
                        }
                    }
                    Err(error) => {
                        warn!(url = %entry.url, %error, "Failed to crawl");
                        failures.push(PageFailure { url: entry.url, error });
                    }
                },
            }
        }

        let visited = state.visited_count();
        let urls = state.into_discovered();
        info!(
            pages = urls.len(),
            visited,
            failed = failures.len(),
            "Finished crawling"
        );

        CrawlReport {
            seed: self.seed.to_string(),
            allowed_prefix: self.scope.prefix().to_string(),
            urls,
            visited,
            failures,
            stop,
        }
    }

    fn at_depth_limit(&self, depth: usize) -> bool {
        self.config.max_depth.is_some_and(|max| depth >= max)
    }

    async fn visit(&self, entry: FrontierEntry) -> (FrontierEntry, Result<String, PageError>) {
        self.pacer.wait(&entry.url).await;
        info!(url = %entry.url, depth = entry.depth, "Crawling");
        let result = self.fetcher.fetch(&entry.url).await;
        (entry, result)
    }

    // Records the in-scope links of a fetched page. Returns true once the
    // page limit has been reached.
    fn expand(&self, state: &mut CrawlState, entry: &FrontierEntry, html: &str) -> bool {
        let base = match Url::parse(&entry.url) {
            Ok(url) => url,
            Err(e) => {
                warn!(url = %entry.url, error = %e, "Cannot resolve links against page URL");
                return false;
            }
        };

        for link in extract_anchor_links(html, &base) {
            let link = normalize_url(&link);
            if !self.scope.contains(link) {
                continue;
            }
            if state.record(link, entry.depth + 1) {
                info!(url = %link, "Found");
                if self
                    .config
                    .max_pages
                    .is_some_and(|max| state.discovered_count() >= max)
                {
                    return true;
                }
            }
        }

        false
    }
}

/// Crawls `config.start_url` over HTTP and returns the discovered URLs.
///
/// Convenience wrapper around [`Crawler`] with the production fetcher stack.
pub async fn crawl_site(config: CrawlConfig) -> Result<Vec<String>, CrawlError> {
    let fetcher = build_fetcher(&config)?;
    let report = Crawler::new(config, fetcher)?.run().await;
    Ok(report.urls)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. What is FuturesUnordered?
//    - A set of futures polled together, yielding results as they finish
//    - len() tells how many fetches are still in flight
//    - The futures run on the current task; nothing is spawned
//
// 2. What does `biased;` do in tokio::select!?
//    - Branches are polled top to bottom instead of in random order
//    - Here: cancellation first, then the time budget, then page results
//
// 3. What is a CancellationToken?
//    - A cloneable flag from tokio-util; cancel() on any clone wakes every
//      cancelled() future
//    - The CLI hands one clone to a Ctrl-C handler
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::config::{FrontierOrder, ScopeMode};
    use crate::fetch::testing::StaticFetcher;

    const SEED: &str = "https://example.com/";

    fn config() -> CrawlConfig {
        CrawlConfig::new(SEED, SEED)
    }

    async fn crawl(config: CrawlConfig, fetcher: StaticFetcher) -> (CrawlReport, Arc<StaticFetcher>) {
        let fetcher = Arc::new(fetcher);
        let crawler = Crawler::new(config, fetcher.clone()).unwrap();
        (crawler.run().await, fetcher)
    }

    fn cyclic_site() -> StaticFetcher {
        StaticFetcher::new()
            .page(SEED, &["/a", "/b", "https://other.com/x"])
            .page("https://example.com/a", &["/", "/c", "/a#top"])
            .page("https://example.com/b", &["/c?page=2", "/d"])
            .page("https://example.com/c", &["/a", "/b", "/d"])
            .page("https://example.com/d", &["/", "/e"])
            .page("https://example.com/e", &["/d"])
    }

    fn expected_cyclic() -> Vec<String> {
        ["a", "b", "c", "d", "e"]
            .iter()
            .map(|p| format!("https://example.com/{p}"))
            .collect()
    }

    #[tokio::test]
    async fn test_query_stripped_and_foreign_links_excluded() {
        let site = StaticFetcher::new()
            .page(SEED, &["https://example.com/a", "https://example.com/b?x=1", "https://other.com/c"])
            .page("https://example.com/a", &["https://example.com/", "https://example.com/a#section"]);

        let (report, _) = crawl(config(), site).await;

        assert_eq!(report.urls, vec!["https://example.com/a", "https://example.com/b"]);
        assert_eq!(report.stop, StopReason::Exhausted);
    }

    #[tokio::test]
    async fn test_unfetchable_seed_yields_empty_result() {
        let site = StaticFetcher::new().failing(SEED, PageError::Timeout);

        let (report, _) = crawl(config(), site).await;

        assert!(report.urls.is_empty());
        assert_eq!(report.visited, 1);
        assert_eq!(
            report.failures,
            vec![PageFailure {
                url: SEED.to_string(),
                error: PageError::Timeout
            }]
        );
    }

    #[tokio::test]
    async fn test_cyclic_graph_terminates_with_all_reachable_pages() {
        let (report, fetcher) = crawl(config(), cyclic_site()).await;

        assert_eq!(report.urls, expected_cyclic());
        assert!(report.failures.is_empty());
        assert!(report.is_clean());

        // Every page fetched exactly once.
        let requests = fetcher.requests();
        let unique: HashSet<_> = requests.iter().collect();
        assert_eq!(unique.len(), requests.len());
        assert_eq!(requests.len(), 6);
    }

    #[tokio::test]
    async fn test_result_independent_of_order_and_concurrency() {
        for order in [FrontierOrder::Lifo, FrontierOrder::Fifo] {
            for concurrency in [1, 3, 16] {
                let mut config = config();
                config.frontier_order = order;
                config.concurrency = concurrency;

                let (report, _) = crawl(config, cyclic_site()).await;
                assert_eq!(report.urls, expected_cyclic(), "{order:?} x{concurrency}");
            }
        }
    }

    #[tokio::test]
    async fn test_lifo_visits_most_recent_first() {
        let site = StaticFetcher::new()
            .page(SEED, &["/a", "/b"])
            .page("https://example.com/a", &[])
            .page("https://example.com/b", &[]);

        let (_, fetcher) = crawl(config(), site).await;

        assert_eq!(
            fetcher.requests(),
            vec![SEED, "https://example.com/b", "https://example.com/a"]
        );
    }

    #[tokio::test]
    async fn test_failed_page_does_not_hide_pages_reachable_elsewhere() {
        let site = StaticFetcher::new()
            .page(SEED, &["/a", "/b"])
            .failing("https://example.com/a", PageError::Status(500))
            .page("https://example.com/b", &["/c"])
            .page("https://example.com/c", &["/a", "/d"])
            .page("https://example.com/d", &[]);

        let (report, _) = crawl(config(), site).await;

        assert_eq!(
            report.urls,
            vec![
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/c",
                "https://example.com/d"
            ]
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, "https://example.com/a");
        assert!(!report.is_clean());
    }

    #[tokio::test]
    async fn test_every_result_starts_with_prefix() {
        let prefix = "https://example.com/docs";
        let site = StaticFetcher::new()
            .page("https://example.com/docs/", &["/docs/a", "/blog/x", "/docs-old/y", "/"])
            .page("https://example.com/docs/a", &["/docs/b"]);
        let config = CrawlConfig::new("https://example.com/docs/", prefix);

        let (report, _) = crawl(config, site).await;

        assert!(report.urls.iter().all(|u| u.starts_with(prefix)));
        // The literal prefix admits /docs-old/.
        assert_eq!(
            report.urls,
            vec![
                "https://example.com/docs-old/y",
                "https://example.com/docs/a",
                "https://example.com/docs/b"
            ]
        );
    }

    #[tokio::test]
    async fn test_path_segment_scope() {
        let site = StaticFetcher::new()
            .page("https://example.com/docs/", &["/docs/a", "/docs-old/y"]);
        let mut config = CrawlConfig::new("https://example.com/docs/", "https://example.com/docs");
        config.scope_mode = ScopeMode::PathSegment;

        let (report, _) = crawl(config, site).await;

        assert_eq!(report.urls, vec!["https://example.com/docs/a"]);
    }

    #[tokio::test]
    async fn test_max_pages_caps_discovered() {
        let site = StaticFetcher::new().page(SEED, &["/a", "/b", "/c", "/d"]);
        let mut config = config();
        config.max_pages = Some(2);

        let (report, fetcher) = crawl(config, site).await;

        assert_eq!(report.urls, vec!["https://example.com/a", "https://example.com/b"]);
        assert_eq!(report.stop, StopReason::PageLimit);
        assert_eq!(fetcher.requests(), vec![SEED]);
    }

    #[tokio::test]
    async fn test_page_limit_stops_with_fetches_in_flight() {
        let site = StaticFetcher::new()
            .page(SEED, &["/a", "/b", "/c", "/d"])
            .page("https://example.com/a", &["/a1", "/a2"])
            .page("https://example.com/b", &["/b1", "/b2"])
            .page("https://example.com/c", &["/c1"])
            .page("https://example.com/d", &["/d1"]);
        let mut config = config();
        config.concurrency = 4;
        config.max_pages = Some(5);

        let (report, _) = crawl(config, site).await;

        assert_eq!(report.stop, StopReason::PageLimit);
        assert_eq!(report.urls.len(), 5);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_max_depth_records_but_does_not_expand() {
        let site = StaticFetcher::new()
            .page(SEED, &["/a"])
            .page("https://example.com/a", &["/b"])
            .page("https://example.com/b", &["/c"]);
        let mut config = config();
        config.max_depth = Some(2);

        let (report, fetcher) = crawl(config, site).await;

        assert_eq!(report.urls, vec!["https://example.com/a", "https://example.com/b"]);
        assert_eq!(fetcher.requests(), vec![SEED, "https://example.com/a"]);
    }

    #[tokio::test]
    async fn test_seed_query_is_normalized() {
        let site = StaticFetcher::new().page(SEED, &["/?utm=x", "/a"]);
        let config = CrawlConfig::new("https://example.com/?utm=start#top", SEED);

        let (report, fetcher) = crawl(config, site).await;

        assert_eq!(report.seed, SEED);
        assert_eq!(report.urls, vec!["https://example.com/a"]);
        assert_eq!(fetcher.requests()[0], SEED);
    }

    #[test]
    fn test_invalid_seed_is_fatal() {
        let result = Crawler::new(CrawlConfig::new("not a url", SEED), StaticFetcher::new());
        assert!(matches!(result, Err(CrawlError::InvalidSeed { .. })));
    }

    #[tokio::test]
    async fn test_crawler_is_stateless_between_runs() {
        let crawler = Crawler::new(config(), cyclic_site()).unwrap();
        let first = crawler.run().await;
        let second = crawler.run().await;
        assert_eq!(first.urls, second.urls);
        assert_eq!(first.visited, second.visited);
    }

    #[tokio::test]
    async fn test_cancelled_crawl_returns_partial_report() {
        let crawler = Crawler::new(config(), cyclic_site()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = crawler.run_until_cancelled(cancel).await;

        assert_eq!(report.stop, StopReason::Cancelled);
        assert!(report.urls.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_case_host_prefix_matches_links() {
        let site = StaticFetcher::new().page(SEED, &["/a", "/b"]);
        let config = CrawlConfig::new(SEED, "https://Example.com/");

        let (report, _) = crawl(config, site).await;

        assert_eq!(report.allowed_prefix, SEED);
        assert_eq!(report.urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[tokio::test]
    async fn test_non_ascii_prefix_matches_encoded_links() {
        let seed = "https://example.com/%C3%BCber/";
        let site = StaticFetcher::new().page(seed, &["/über/a", "/über/b", "/other"]);
        let config = CrawlConfig::new("https://example.com/über/", "https://example.com/über/");

        let (report, fetcher) = crawl(config, site).await;

        assert_eq!(fetcher.requests()[0], seed);
        assert_eq!(
            report.urls,
            vec![
                "https://example.com/%C3%BCber/a",
                "https://example.com/%C3%BCber/b"
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_spaces_out_fetches() {
        let site = StaticFetcher::new()
            .page(SEED, &["/a"])
            .page("https://example.com/a", &["/b"])
            .page("https://example.com/b", &[]);
        let mut config = config();
        config.delay = Some(Duration::from_millis(500));

        let started = tokio::time::Instant::now();
        let (report, fetcher) = crawl(config, site).await;

        assert_eq!(fetcher.requests().len(), 3);
        assert_eq!(report.urls, vec!["https://example.com/a", "https://example.com/b"]);
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    /// Never answers for one URL; everything else comes from the inner site.
    struct Hanging {
        inner: StaticFetcher,
        stuck: &'static str,
    }

    #[async_trait]
    impl PageFetcher for Hanging {
        async fn fetch(&self, url: &str) -> Result<String, PageError> {
            if url == self.stuck {
                std::future::pending::<()>().await;
            }
            self.inner.fetch(url).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_crawl_budget_keeps_discovered_urls() {
        let fetcher = Hanging {
            inner: StaticFetcher::new().page(SEED, &["/a", "/b"]),
            stuck: "https://example.com/b",
        };
        let mut config = config();
        config.crawl_timeout = Some(Duration::from_secs(30));

        let report = Crawler::new(config, fetcher).unwrap().run().await;

        assert_eq!(report.stop, StopReason::TimedOut);
        assert_eq!(report.urls, vec!["https://example.com/a", "https://example.com/b"]);
    }
}
