//! Bill-Harvest main entry point
//!
//! This is the command-line interface for the Bill-Harvest legislative bill
//! harvester.

use anyhow::{Context, Result};
use bill_harvest::config::{load_config_with_hash, Config};
use bill_harvest::harvest::{harvest, listing_urls, user_agent_string};
use bill_harvest::storage::{open_store, BillStore};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Bill-Harvest: an incremental legislative bill harvester
///
/// Bill-Harvest walks the paginated bill search of a legislature website,
/// extracts every new bill's full text and stores one JSON record per bill.
/// Bills already on disk are skipped, so interrupted runs resume by re-running.
#[derive(Parser, Debug)]
#[command(name = "bill-harvest")]
#[command(version = "1.0.0")]
#[command(about = "An incremental legislative bill harvester", long_about = None)]
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

    /// Override the first listing page to visit
    #[arg(long, value_name = "PAGE")]
    start_page: Option<u32>,

    /// Override the last listing page to visit
    #[arg(long, value_name = "PAGE")]
    end_page: Option<u32>,

    /// Re-harvest bills that are already stored
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long, conflicts_with_all = ["stats", "export_summary", "foundations"])]
    dry_run: bool,

    /// Show statistics of the stored bills and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary", "foundations"])]
    stats: bool,

    /// Write the CSV metadata export of the stored bills and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "foundations"])]
    export_summary: bool,

    /// Download the federal foundation datasets and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "export_summary"])]
    foundations: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    apply_overrides(&mut config, &cli)?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if cli.export_summary {
        handle_export_summary(&config)
    } else if cli.foundations {
        handle_foundations(&config).await
    } else {
        handle_harvest(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bill_harvest=info,warn"),
            1 => EnvFilter::new("bill_harvest=debug,info"),
            2 => EnvFilter::new("bill_harvest=trace,debug"),
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

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(page) = cli.start_page {
        config.scraper.start_page = page;
    }
    if let Some(page) = cli.end_page {
        config.scraper.end_page = page;
    }
    if cli.fresh {
        config.scraper.skip_existing = false;
    }

    anyhow::ensure!(
        config.scraper.start_page >= 1 && config.scraper.start_page <= config.scraper.end_page,
        "invalid page range {}..={}",
        config.scraper.start_page,
        config.scraper.end_page
    );
    Ok(())
}

/// Handles the --dry-run mode: shows settings and the listing URLs
fn handle_dry_run(config: &Config) -> Result<()> {
    println!("=== Bill-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Session: {}", config.site.session_label);
    println!("  Session filter: {}", config.site.session_filter);
    println!("  Jurisdiction: {}", config.site.jurisdiction);

    println!("\nHarvest:");
    println!(
        "  Pages: {}..={}",
        config.scraper.start_page, config.scraper.end_page
    );
    println!("  Request delay: {}ms", config.scraper.request_delay_ms);
    println!("  Timeout: {}s", config.scraper.timeout_secs);
    println!("  Skip existing: {}", config.scraper.skip_existing);

    println!("\nExtraction:");
    println!("  Minimum text length: {}", config.extraction.min_text_length);
    println!(
        "  Export minimum length: {}",
        config.extraction.export_min_length
    );
    println!(
        "  Content selectors: {}",
        config.extraction.content_selectors.join(", ")
    );

    println!("\nUser Agent: {}", user_agent_string(&config.user_agent));
    println!("\nOutput: {}", config.output.data_dir);

    let urls = listing_urls(config)?;
    println!("\nListing URLs ({}):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics of the stored bills
fn handle_stats(config: &Config) -> Result<()> {
    use bill_harvest::output::{compute_statistics, print_statistics};

    println!("Data directory: {}\n", config.output.data_dir);

    let store = open_store(Path::new(&config.output.data_dir))?;
    let records = store.load_all();
    let stats = compute_statistics(&records, config.extraction.export_min_length);

    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-summary mode: writes the CSV metadata export
fn handle_export_summary(config: &Config) -> Result<()> {
    use bill_harvest::output::export_metadata_csv;

    println!("=== Exporting Bill Metadata ===\n");

    let store = open_store(Path::new(&config.output.data_dir))?;
    let records = store.load_all();
    let path = export_metadata_csv(&records, &store.processed_dir())?;

    println!("✓ {} bills exported to: {}", records.len(), path.display());

    Ok(())
}

/// Handles the --foundations mode: downloads the dataset samples
async fn handle_foundations(config: &Config) -> Result<()> {
    use bill_harvest::foundations::setup_foundations;

    let report = setup_foundations(&config.foundations, &config.user_agent).await?;

    for (path, count) in &report.datasets {
        println!("✓ {} items -> {}", count, path.display());
    }
    for name in &report.unavailable {
        println!("✗ {} unavailable", name);
    }
    for path in &report.references {
        println!("✓ {}", path.display());
    }

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> Result<()> {
    if config.scraper.skip_existing {
        tracing::info!("Starting harvest (stored bills are skipped)");
    } else {
        tracing::info!("Starting fresh harvest (stored bills are fetched again)");
    }

    let report = harvest(config).await.context("harvest failed")?;

    println!("\n=== Harvest Report ===\n");
    println!(
        "  Pages visited: {} ({} failed)",
        report.pages_visited, report.page_failures
    );
    println!("  Bills listed: {}", report.bills_listed);
    println!("  Persisted: {}", report.persisted);
    println!("  Skipped: {}", report.skipped);
    println!("  Persist failures: {}", report.persist_failures);
    println!("  Text exports: {}", report.texts_exported);
    println!("  Text sources:");
    for (source, count) in &report.by_source {
        println!("    {}: {}", source, count);
    }
    if report.stopped_early {
        println!("  Stopped early: a page listed only stored bills");
    }

    Ok(())
}
