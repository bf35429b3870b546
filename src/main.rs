//! stock-sync - Sync shop prices and stock into a Google Sheets catalog
//!
//! Scrapes two shops, writes prices back to the catalog, and sends Telegram alerts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stock_sync::commands::{format_subscribers, CheckCommand, RunCommand};
use stock_sync::config::Config;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stock-sync",
    version,
    about = "Sync shop prices and stock into a Google Sheets catalog",
    long_about = "Scrapes Shop A and Shop B for every catalog row, writes prices and stock back \
                  to Google Sheets, and sends Telegram alerts for price gaps and out-of-stock products."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write a per-run log file into this directory
    #[arg(long, global = true, env = "STOCK_SYNC_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Spreadsheet id or URL
    #[arg(long, global = true)]
    spreadsheet: Option<String>,

    /// Worksheet name
    #[arg(long, global = true)]
    worksheet: Option<String>,

    /// Proxy URL for the shop scrapers (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape both shops, update the catalog, and send alerts
    #[command(alias = "r")]
    Run {
        /// Whole-run attempts before giving up
        #[arg(short, long)]
        attempts: Option<u32>,

        /// Seconds to wait between attempts
        #[arg(long)]
        retry_delay: Option<u64>,

        /// Scrape, but only log catalog writes and alerts
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the catalog columns and count rows without scraping
    Check,

    /// List alert subscribers and their categories
    Subscribers,
}

fn init_tracing(verbose: bool, log_dir: Option<&Path>) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive("stock_sync=info".parse()?)
    };

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

            let name = format!("scraper_{}.log", chrono::Local::now().format("%Y%m%d_%H%M%S"));
            let path = dir.join(name);
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            Some(tracing_subscriber::fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_dir.as_deref())?;

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(spreadsheet) = cli.spreadsheet {
        config.spreadsheet = Some(spreadsheet);
    }
    if let Some(worksheet) = cli.worksheet {
        config.worksheet = worksheet;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Run { attempts, retry_delay, dry_run } => {
            if let Some(attempts) = attempts {
                config.max_attempts = attempts;
            }
            if let Some(secs) = retry_delay {
                config.retry_delay_secs = secs;
            }

            let cmd = RunCommand::new(config).dry_run(dry_run);
            let report = cmd.execute().await?;
            println!("{}", report);
        }

        Commands::Check => {
            let cmd = CheckCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Subscribers => {
            println!("{}", format_subscribers(&config.subscriptions));
        }
    }

    Ok(())
}
