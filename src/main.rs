//! feedsearch CLI - search every configured feed for a term.
//!
//! # Examples
//!
//! ```bash
//! # Search the bundled feed list
//! feedsearch president
//!
//! # Another feed list, at most four feeds at a time, give up after 20s
//! feedsearch --feeds feeds.json --workers 4 --timeout-secs 20 election
//!
//! # Verbose engine logs
//! RUST_LOG=feedsearch=debug feedsearch president
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use feedsearch::{matchers, JsonFeedFile, Registry, WriterPresenter};
use tracing_subscriber::EnvFilter;

/// Search RSS feeds concurrently for a term
#[derive(Parser, Debug)]
#[command(name = "feedsearch")]
#[command(version)]
#[command(about = "Search a list of feeds concurrently for a term", long_about = None)]
struct Cli {
    /// Regular expression to look for in each item's title and description
    #[arg(default_value = "president")]
    term: String,

    /// JSON file listing the feeds to search
    #[arg(long, env = "FEEDSEARCH_FEEDS", default_value = "data/data.json")]
    feeds: PathBuf,

    /// Maximum number of feeds searched at once [default: logical CPU count]
    #[arg(long, env = "FEEDSEARCH_WORKERS")]
    workers: Option<usize>,

    /// Give up on unfinished feeds after this many seconds
    #[arg(long, env = "FEEDSEARCH_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Results buffered between workers and the output
    #[arg(long, default_value_t = 0)]
    buffer: usize,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut registry = Registry::new();
    matchers::register_all(&mut registry).context("matcher registration")?;

    let mut builder = feedsearch::search()
        .feeds(JsonFeedFile::new(&cli.feeds))
        .registry(registry)
        .presenter(WriterPresenter::stdout())
        .buffer(cli.buffer);

    if let Some(n) = cli.workers {
        builder = builder.workers(n);
    }
    if let Some(secs) = cli.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    let results = builder
        .run(&cli.term)
        .with_context(|| format!("search for '{}' failed", cli.term))?;

    if !results.stats.is_complete() {
        tracing::warn!(
            failed = results.stats.failed,
            cancelled = results.stats.cancelled,
            "some feeds returned no results"
        );
    }
    Ok(())
}

/// Log to stdout, `feedsearch=info` unless `RUST_LOG` says otherwise.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedsearch=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}
