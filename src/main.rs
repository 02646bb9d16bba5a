//! Larder main entry point
//!
//! This is the command-line interface for the Larder catalog harvester.

use clap::Parser;
use larder::config::load_config_with_hash;
use larder::harvest::{run_harvest, HarvestOptions};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Larder: a polite catalog harvester
///
/// Larder walks the configured category listing pages of a catalog
/// storefront, follows product links to their detail pages, extracts and
/// normalizes the product fields, and writes the assembled catalog to a
/// fixed-column CSV file.
#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(version = "1.0.0")]
#[command(about = "A polite catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,

    /// Stop after this many catalog entries
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Write the CSV here instead of the configured path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, cli.limit).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("larder=info,warn"),
            1 => EnvFilter::new("larder=debug,info"),
            2 => EnvFilter::new("larder=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be
/// harvested
fn handle_dry_run(config: &larder::config::Config) {
    println!("=== Larder Dry Run ===\n");

    println!("Harvester Configuration:");
    println!("  Max attempts per URL: {}", config.harvester.max_attempts);
    println!(
        "  Request timeout: {}s",
        config.harvester.request_timeout_secs
    );
    println!(
        "  Politeness delay: {}-{}ms",
        config.harvester.politeness_delay_ms.min, config.harvester.politeness_delay_ms.max
    );
    println!(
        "  Retry backoff: {}-{}ms",
        config.harvester.retry_backoff_ms.min, config.harvester.retry_backoff_ms.max
    );
    println!(
        "  Max listing pages per category: {}",
        config.harvester.max_listing_pages
    );
    println!(
        "  Max detail pages per category: {}",
        config.harvester.max_details_per_category
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.harvester_name);
    println!("  Version: {}", config.user_agent.harvester_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nSite:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Content prefix: {}", config.site.content_path_prefix);
    println!("  Pagination parameter: {}", config.site.pagination_param);

    println!("\nCategories ({}):", config.category.len());
    for entry in &config.category {
        match entry.default_packaging {
            Some(packaging) => {
                println!("  - {} ({}) [default: {}]", entry.name, entry.path, packaging.as_str())
            }
            None => println!("  - {} ({})", entry.name, entry.path),
        }
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would harvest {} categories from {}",
        config.category.len(),
        config.site.base_url
    );
}

/// Handles the main harvest operation
async fn handle_harvest(config: larder::config::Config, limit: Option<usize>) -> anyhow::Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));

    // First Ctrl-C requests a graceful stop; the partial flush happens in
    // the driver
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing up and saving partial results");
            flag.store(true, Ordering::Relaxed);
        }
    });

    if let Some(limit) = limit {
        tracing::info!("Entry limit: {}", limit);
    }

    let options = HarvestOptions { limit };
    match run_harvest(&config, options, cancel).await {
        Ok(summary) => {
            tracing::info!(
                "Harvest finished: {} entries persisted, {} categories, {} pages",
                summary.entries_persisted,
                summary.categories_visited,
                summary.pages_fetched
            );
            if summary.interrupted {
                tracing::warn!("Run was interrupted; output went to a partial file");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
