//! Mirror-Crawl main entry point
//!
//! This is the command-line interface for the Mirror-Crawl file-tree mirror.

use anyhow::Context;
use clap::Parser;
use mirror_crawl::config::{load_config, Config};
use mirror_crawl::crawler::Crawler;
use mirror_crawl::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mirror-Crawl: mirror a remote file tree into a local directory
///
/// Mirror-Crawl follows the links of HTML pages below the root URL and saves
/// every other resource it finds. Etags from earlier runs are replayed, so
/// unchanged files are not downloaded again.
#[derive(Parser, Debug)]
#[command(name = "mirror-crawl")]
#[command(version)]
#[command(about = "Mirror a remote file tree into a local directory", long_about = None)]
struct Cli {
    /// File server root url [default: http://localhost:8000/]
    #[arg(short = 'r', long = "root", value_name = "URL")]
    root: Option<String>,

    /// Number of workers (maximum concurrent HTTP requests) [default: 10]
    #[arg(short = 'w', long = "workers", value_name = "N")]
    workers: Option<usize>,

    /// Maximum crawl depth [default: 20]
    #[arg(short = 'd', long = "depth", value_name = "N")]
    depth: Option<u32>,

    /// HTTP request timeout in seconds [default: 20]
    #[arg(short = 't', long = "timeout", value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Directory holding the mirror and its metadata [default: .]
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    output: Option<String>,

    /// Optional TOML configuration file; flags override its values
    #[arg(short = 'c', long = "config", value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies explicitly given flags on top of a loaded configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(root) = &self.root {
            config.crawler.root = root.clone();
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
        if let Some(depth) = self.depth {
            config.crawler.max_depth = depth;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout = timeout;
        }
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let base = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };
    let config = cli.apply(base);

    let crawler = match Crawler::new(config).await {
        Ok(crawler) => crawler,
        Err(e) => {
            tracing::error!("Failed to start crawl: {}", e);
            return Err(e.into());
        }
    };

    let report = crawler.run().await.context("crawl failed")?;
    print_report(&report);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mirror_crawl=info,warn"),
            1 => EnvFilter::new("mirror_crawl=debug,info"),
            2 => EnvFilter::new("mirror_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
