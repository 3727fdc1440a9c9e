//! dblp-harvest main entry point
//!
//! This is the command-line interface for the dblp-harvest venue harvester.

use clap::Parser;
use dblp_harvest::config::{load_config_with_hash, Config};
use dblp_harvest::crawler::{crawl_venues, parse_venue_list, CrawlRequest};
use dblp_harvest::resolve_venue;
use dblp_harvest::search::{search_venue, KeywordQuery};
use dblp_harvest::storage::open_store;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// dblp-harvest: an incremental DBLP venue harvester
///
/// Walks the index page of each named venue, saves every edition page it
/// links to, and extracts track, paper and author records from them. Runs are
/// resumable: pages already fetched or parsed are skipped.
#[derive(Parser, Debug)]
#[command(name = "dblp-harvest")]
#[command(version = "1.0.0")]
#[command(about = "An incremental DBLP venue harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH", default_value = "harvest.toml")]
    config: PathBuf,

    /// Venues to process, joined with '+' (e.g. AAAI+IJCAI)
    #[arg(long, value_name = "A+B+C")]
    venues: String,

    /// Re-fetch and re-parse pages the ledger already marks as done
    #[arg(long, visible_alias = "always-update")]
    force_refresh: bool,

    /// Fetch and save raw pages without extracting records
    #[arg(long)]
    skip_parse: bool,

    /// Only process pages whose name starts with the venue name
    #[arg(long)]
    strict_prefix: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with = "search")]
    dry_run: bool,

    /// Search stored records by title keywords ('a+b' = all, 'a|b' = any)
    #[arg(long, value_name = "KEYWORDS", conflicts_with = "dry_run")]
    search: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let request = CrawlRequest {
        venues: parse_venue_list(&cli.venues),
        force_refresh: cli.force_refresh,
        skip_parse: cli.skip_parse,
        strict_prefix: cli.strict_prefix,
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, &request);
    } else if let Some(keywords) = cli.search.as_deref() {
        handle_search(&config, &request, keywords);
    } else {
        handle_crawl(&config, &request).await;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dblp_harvest=info,warn"),
            1 => EnvFilter::new("dblp_harvest=debug,info"),
            2 => EnvFilter::new("dblp_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved venues and settings
fn handle_dry_run(config: &Config, request: &CrawlRequest) {
    println!("=== dblp-harvest Dry Run ===\n");

    println!("Fetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!(
        "  Politeness delay: {}ms",
        config.fetcher.politeness_delay_ms
    );
    for (name, value) in &config.fetcher.headers {
        println!("  Header: {}: {}", name, value);
    }

    println!("\nStorage:");
    println!("  Root: {}", config.storage.root_dir);

    println!("\nRun:");
    println!("  Force refresh: {}", request.force_refresh);
    println!("  Skip parse: {}", request.skip_parse);
    println!("  Strict prefix: {}", request.strict_prefix);
    match &config.extract.default_track {
        Some(track) => println!("  Untitled lists go to: {}", track),
        None => println!("  Untitled lists: skipped"),
    }

    println!("\nVenues ({}):", request.venues.len());
    for name in &request.venues {
        match config.venue_locator(name) {
            Some(locator) => match resolve_venue(locator) {
                Ok(venue) => println!("  - {} -> {} ({})", name, venue, locator),
                Err(e) => println!("  - {} -> invalid locator: {}", name, e),
            },
            None => println!("  - {} -> not configured, would be skipped", name),
        }
    }
}

/// Handles the --search mode: prints matching papers from stored records
fn handle_search(config: &Config, request: &CrawlRequest, keywords: &str) {
    let query = KeywordQuery::parse(keywords);
    if query.terms().is_empty() {
        tracing::warn!("Search query '{}' has no keywords", keywords);
        return;
    }

    let store = open_store(&config.storage);

    for name in &request.venues {
        let Some(locator) = config.venue_locator(name) else {
            tracing::error!("Unknown venue: {}", name);
            continue;
        };
        let venue = match resolve_venue(locator) {
            Ok(venue) => venue,
            Err(e) => {
                tracing::error!("Venue {}: {}", name, e);
                continue;
            }
        };

        match search_venue(store.clone(), &venue, &query) {
            Ok(hits) => {
                println!("=== {} ({} matches) ===", name, hits.len());
                for hit in hits {
                    let authors: Vec<&str> =
                        hit.paper.authors.iter().map(|a| a.name.as_str()).collect();
                    println!("[{}] {} / {}", hit.page_name, hit.track, hit.paper.title);
                    println!("    {}", authors.join(", "));
                }
            }
            Err(e) => tracing::error!("Search in {} failed: {}", name, e),
        }
    }
}

/// Handles the main harvest operation
async fn handle_crawl(config: &Config, request: &CrawlRequest) {
    if request.force_refresh {
        tracing::info!("Starting harvest (refreshing every page)");
    } else {
        tracing::info!("Starting harvest (resuming from ledgers)");
    }
    tracing::info!("Venues: {}", request.venues.join(", "));

    match crawl_venues(config, request).await {
        Ok(reports) => {
            let clean = reports.iter().filter(|r| r.is_clean()).count();
            tracing::info!(
                "Harvest finished: {}/{} venues without failures",
                clean,
                reports.len()
            );
        }
        Err(e) => tracing::error!("Harvest failed: {}", e),
    }
}
