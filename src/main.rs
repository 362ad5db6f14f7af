// src/main.rs
// =============================================================================
// Entry point of the scopecrawl CLI.
//
// What happens here:
// 1. Set up logging (stderr) and parse command-line arguments
// 2. Build the crawler from the flags and run it, cancellable with Ctrl-C
// 3. Print the result (crawl) or write the document corpus (load)
// 4. Exit with a proper code:
//    0 = finished cleanly, 1 = finished but some pages failed, 2 = error
// =============================================================================

mod cli;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use cli::{Cli, Commands, CrawlArgs};
use scopecrawl::{build_fetcher, load_documents, CrawlReport, Crawler, PageFetcher, StopReason};

#[tokio::main]
async fn main() {
    scopecrawl::logging::init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl { crawl, json } => handle_crawl(crawl, json).await,
        Commands::Load { crawl, output } => handle_load(crawl, &output).await,
    }
}

// Handles the 'crawl' subcommand: URLs to stdout, one per line, or a JSON report.
async fn handle_crawl(args: CrawlArgs, json: bool) -> Result<i32> {
    let (report, _) = run_crawl(args).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for url in &report.urls {
            println!("{url}");
        }
    }

    Ok(exit_code(&report))
}

// Handles the 'load' subcommand: crawl, load every page, write JSON Lines.
async fn handle_load(args: CrawlArgs, output: &Path) -> Result<i32> {
    let concurrency = args.concurrency;
    let (report, fetcher) = run_crawl(args).await?;

    // The start page has content too, even though it is not part of the
    // crawl result.
    let mut urls = Vec::with_capacity(report.urls.len() + 1);
    urls.push(report.seed.clone());
    urls.extend(report.urls.iter().cloned());

    println!("📄 Loading {} page(s)...", urls.len());
    let documents = load_documents(fetcher.as_ref(), &urls, concurrency).await;

    let file = File::create(output)
        .with_context(|| format!("cannot create output file {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    for document in &documents {
        serde_json::to_writer(&mut writer, document)?;
        writer.write_all(b"\n")?;
    }
    writer
        .flush()
        .with_context(|| format!("cannot write output file {}", output.display()))?;

    println!("✅ Wrote {} document(s) to {}", documents.len(), output.display());

    if documents.len() < urls.len() {
        warn!(
            missing = urls.len() - documents.len(),
            "Some pages could not be loaded"
        );
        return Ok(1);
    }
    Ok(exit_code(&report))
}

async fn run_crawl(args: CrawlArgs) -> Result<(CrawlReport, Arc<dyn PageFetcher>)> {
    let config = args.into_config();
    let fetcher: Arc<dyn PageFetcher> = Arc::new(build_fetcher(&config)?);
    let crawler = Crawler::new(config, fetcher.clone())?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping crawl");
            on_interrupt.cancel();
        }
    });

    let report = crawler.run_until_cancelled(cancel).await;
    Ok((report, fetcher))
}

// Hitting --max-pages is a normal ending; failed pages or an interrupted
// crawl are not.
fn exit_code(report: &CrawlReport) -> i32 {
    let finished = matches!(report.stop, StopReason::Exhausted | StopReason::PageLimit);
    if finished && report.failures.is_empty() {
        0
    } else {
        1
    }
}
