// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Two subcommands share the same crawl flags (CrawlArgs, flattened in):
// - crawl: print the in-scope URLs reachable from a start page
// - load:  crawl, then fetch every page and write it out as a text document
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use scopecrawl::config::{CrawlConfig, FrontierOrder, RetryPolicy, ScopeMode};
use scopecrawl::crawl::normalize_seed;

#[derive(Parser, Debug)]
#[command(
    name = "scopecrawl",
    version,
    about = "Crawl a website within a URL prefix and load its pages as text documents",
    long_about = "scopecrawl follows anchor links from a start page, keeping only URLs that start \
                  with an allowed prefix. The discovered pages can be printed or loaded into a \
                  JSON Lines corpus for an indexing service."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every in-scope page reachable from the start URL
    ///
    /// Example: scopecrawl crawl https://example.com/docs/ --concurrency 4
    Crawl {
        #[command(flatten)]
        crawl: CrawlArgs,

        /// Print the full crawl report as JSON instead of one URL per line
        #[arg(long)]
        json: bool,
    },

    /// Crawl, then load every page as a text document (JSON Lines output)
    ///
    /// Example: scopecrawl load https://example.com/ --output corpus.jsonl
    Load {
        #[command(flatten)]
        crawl: CrawlArgs,

        /// File to write the documents to, one JSON object per line
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CrawlArgs {
    /// Page the crawl starts from (e.g., https://example.com/)
    pub start_url: String,

    /// Only follow URLs starting with this string (default: the start URL)
    #[arg(long)]
    pub prefix: Option<String>,

    /// How the prefix is matched against URLs
    #[arg(long, value_enum, default_value_t = ScopeMode::Prefix)]
    pub scope_mode: ScopeMode,

    /// Which end of the frontier is processed next
    #[arg(long, value_enum, default_value_t = FrontierOrder::Lifo)]
    pub order: FrontierOrder,

    /// Timeout for a single page request, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Minimum delay between requests to the same host, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Stop after discovering this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Do not expand pages more than this many links away from the start URL
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Number of pages fetched at the same time
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Extra attempts for timeouts, connection errors, 429 and 5xx answers
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Base delay between retries, in milliseconds (grows linearly)
    #[arg(long, default_value_t = 500)]
    pub retry_backoff_ms: u64,

    /// Give up on the whole crawl after this many seconds, keeping partial results
    #[arg(long)]
    pub crawl_timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}

impl CrawlArgs {
    pub fn into_config(self) -> CrawlConfig {
        // Same as the start page unless told otherwise. An unusable start URL
        // is reported later by the crawler itself.
        let prefix = self.prefix.unwrap_or_else(|| {
            normalize_seed(&self.start_url)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| self.start_url.clone())
        });

        let mut config = CrawlConfig::new(self.start_url, prefix);
        config.scope_mode = self.scope_mode;
        config.frontier_order = self.order;
        config.request_timeout = Duration::from_secs(self.timeout_secs);
        config.delay = self.delay_ms.map(Duration::from_millis);
        config.max_pages = self.max_pages;
        config.max_depth = self.max_depth;
        config.concurrency = self.concurrency;
        config.retry = RetryPolicy {
            max_retries: self.retries,
            backoff: Duration::from_millis(self.retry_backoff_ms),
        };
        config.crawl_timeout = self.crawl_timeout_secs.map(Duration::from_secs);
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        config
    }
}
