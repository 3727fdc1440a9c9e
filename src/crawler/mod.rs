//! Crawler module for venue harvesting
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching
//! - Request throttling
//! - Per-venue crawl coordination and run reports

mod coordinator;
mod fetcher;
mod report;
mod throttle;

pub use coordinator::{CrawlOptions, VenueCrawler, MAX_CONSECUTIVE_STORAGE_FAILURES};
pub use fetcher::{build_http_client, fetch_url, FetchError, Fetcher, HttpFetcher};
pub use report::{ChildOutcome, FetchStep, ParseStep, VenueReport};
pub use throttle::Throttle;

use crate::config::Config;
use crate::storage::{open_store, Store};
use crate::HarvestError;
use std::sync::Arc;
use std::time::Duration;

/// What to harvest in one invocation
#[derive(Debug, Clone, Default)]
pub struct CrawlRequest {
    /// Venue names as they appear in the config's venue table
    pub venues: Vec<String>,

    /// Redo pages the ledger already marks as done
    pub force_refresh: bool,

    pub skip_parse: bool,
    pub strict_prefix: bool,
}

impl CrawlRequest {
    fn options(&self) -> CrawlOptions {
        CrawlOptions {
            skip_parse: self.skip_parse,
            strict_prefix: self.strict_prefix,
        }
    }
}

/// Splits a `+`-joined venue list such as `"AAAI+IJCAI"`
///
/// Blank entries are dropped.
///
/// # Example
///
/// ```
/// use dblp_harvest::crawler::parse_venue_list;
///
/// assert_eq!(parse_venue_list("AAAI+ IJCAI+"), vec!["AAAI", "IJCAI"]);
/// ```
pub fn parse_venue_list(list: &str) -> Vec<String> {
    list.split('+')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Harvests the requested venues over HTTP into the configured store
///
/// This is the main entry point for a harvest. It will:
/// 1. Build the HTTP client
/// 2. Open the store
/// 3. Crawl each requested venue in order
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `request` - Venues and switches for this run
///
/// # Returns
///
/// * `Ok(Vec<VenueReport>)` - One report per venue that ran
/// * `Err(HarvestError)` - The HTTP client could not be built
pub async fn crawl_venues(
    config: &Config,
    request: &CrawlRequest,
) -> Result<Vec<VenueReport>, HarvestError> {
    let fetcher = HttpFetcher::new(&config.fetcher)?;
    let store = open_store(&config.storage);
    Ok(run_venues(fetcher, store, config, request).await)
}

/// Crawls the requested venues with the given fetcher and store
///
/// Unknown venue names are logged and skipped. A venue that fails is logged
/// and does not stop the ones after it.
pub async fn run_venues<F: Fetcher>(
    fetcher: F,
    store: Arc<dyn Store>,
    config: &Config,
    request: &CrawlRequest,
) -> Vec<VenueReport> {
    let mut crawler = VenueCrawler::new(
        fetcher,
        store,
        Duration::from_millis(config.fetcher.politeness_delay_ms),
    )
    .with_extract_options(config.extract.options())
    .with_options(request.options());

    let mut reports = Vec::new();

    for name in &request.venues {
        let Some(locator) = config.venue_locator(name) else {
            tracing::error!("{}", HarvestError::UnknownVenue(name.clone()));
            continue;
        };

        match crawler.run(locator, request.force_refresh).await {
            Ok(report) => {
                report.log_summary();
                reports.push(report);
            }
            Err(e) => {
                tracing::error!("Venue {} failed: {}", name, e);
            }
        }
    }

    reports
}
