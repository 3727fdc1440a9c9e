//! Venue crawl coordination
//!
//! One venue run goes: resolve the venue, open its ledger, fetch the index,
//! then walk the listed edition pages in order. Each page is fetched if the
//! ledger says it hasn't been, then parsed if the ledger says it hasn't been.
//! A page that fails is logged and left for the next run; its siblings carry
//! on.

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::report::{ChildOutcome, FetchStep, ParseStep, VenueReport};
use crate::crawler::throttle::Throttle;
use crate::extract::{extract_child_links, extract_page, ExtractOptions};
use crate::ledger::ResumeLedger;
use crate::locator::{resolve_page, resolve_venue, PageRef};
use crate::storage::{layout, Store};
use crate::HarvestError;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Storage failures in a row after which a venue run gives up
pub const MAX_CONSECUTIVE_STORAGE_FAILURES: usize = 3;

/// Switches that shape a venue run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Fetch and save raw pages only
    pub skip_parse: bool,

    /// Skip pages whose name does not start with the venue name
    pub strict_prefix: bool,
}

/// Drives the crawl of one venue at a time
pub struct VenueCrawler<F> {
    fetcher: F,
    store: Arc<dyn Store>,
    extract: ExtractOptions,
    options: CrawlOptions,
    throttle: Throttle,
}

impl<F: Fetcher> VenueCrawler<F> {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of page bodies
    /// * `store` - Where ledgers and snapshots live
    /// * `politeness_delay` - Minimum spacing between requests
    pub fn new(fetcher: F, store: Arc<dyn Store>, politeness_delay: Duration) -> Self {
        Self {
            fetcher,
            store,
            extract: ExtractOptions::default(),
            options: CrawlOptions::default(),
            throttle: Throttle::new(politeness_delay),
        }
    }

    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    pub fn with_options(mut self, options: CrawlOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls one venue
    ///
    /// # Arguments
    ///
    /// * `index_url` - Locator of the venue index page
    /// * `force_refresh` - Re-fetch and re-parse pages the ledger marks done
    ///
    /// # Returns
    ///
    /// * `Ok(VenueReport)` - The run finished; individual pages may still have
    ///   failed, and an unreachable index gives a report with
    ///   `index_fetched == false`
    /// * `Err(HarvestError)` - The index locator is malformed, the ledger
    ///   can't be opened, or the store failed repeatedly
    pub async fn run(
        &mut self,
        index_url: &str,
        force_refresh: bool,
    ) -> Result<VenueReport, HarvestError> {
        let venue = resolve_venue(index_url)?;
        let mut ledger = ResumeLedger::open(self.store.clone(), &venue)?;
        let mut report = VenueReport::new(venue.clone());

        tracing::info!("Crawling {} from {}", venue, index_url);

        let index = match self.throttled_fetch(index_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to fetch index of {}: {}", venue, e);
                report.finish();
                return Ok(report);
            }
        };
        report.index_fetched = true;

        let links = extract_child_links(&index, venue.venue_type, index_url);
        report.pages_total = links.len();
        tracing::info!("{}: {} edition pages listed", venue, links.len());

        let mut consecutive_storage_failures = 0;

        for link in &links {
            match self.process_child(&mut ledger, link, force_refresh).await {
                Ok(outcome) => {
                    consecutive_storage_failures = 0;
                    report.record(outcome);
                }
                Err(e) => {
                    tracing::error!("Error processing {}: {}", link, e);
                    report.record_error();

                    if matches!(e, HarvestError::Storage(_)) {
                        consecutive_storage_failures += 1;
                        if consecutive_storage_failures >= MAX_CONSECUTIVE_STORAGE_FAILURES {
                            tracing::error!(
                                "{}: {} storage failures in a row, aborting venue",
                                venue,
                                consecutive_storage_failures
                            );
                            return Err(e);
                        }
                    }
                }
            }
        }

        report.finish();
        Ok(report)
    }

    /// Processes a single edition page
    ///
    /// Steps, each gated by the ledger unless `force_refresh` is set:
    /// 1. Fetch, save the raw snapshot, mark fetched
    /// 2. Extract records (from the fresh body or the saved snapshot), save
    ///    them, mark parsed
    async fn process_child(
        &mut self,
        ledger: &mut ResumeLedger,
        link: &str,
        force_refresh: bool,
    ) -> Result<ChildOutcome, HarvestError> {
        let page = resolve_page(link)?;

        if self.options.strict_prefix && !page.matches_venue_prefix() {
            tracing::info!(
                "Page {} does not belong to venue {}, skipping",
                page.page_name,
                page.venue_name
            );
            return Ok(ChildOutcome::Filtered);
        }

        let (fresh_body, mut fetch) = if ledger.is_fetched(link) && !force_refresh {
            tracing::debug!("Already fetched {}", link);
            (None, FetchStep::Skipped)
        } else {
            match self.fetch_and_save(ledger, link, &page).await? {
                Some(body) => (Some(body), FetchStep::Fetched),
                None => return Ok(ChildOutcome::FetchFailed),
            }
        };

        if self.options.skip_parse {
            return Ok(ChildOutcome::Done {
                fetch,
                parse: ParseStep::Disabled,
            });
        }

        if ledger.is_parsed(link) && !force_refresh {
            tracing::debug!("Already parsed {}", link);
            return Ok(ChildOutcome::Done {
                fetch,
                parse: ParseStep::Skipped,
            });
        }

        let html = match fresh_body {
            Some(body) => body,
            None => match self.store.load_text(&layout::raw_snapshot_path(&page)) {
                Ok(saved) => saved,
                Err(e) if e.is_not_found() => {
                    tracing::warn!("Raw snapshot of {} is missing, fetching again", link);
                    match self.fetch_and_save(ledger, link, &page).await? {
                        Some(body) => {
                            fetch = FetchStep::Fetched;
                            body
                        }
                        None => return Ok(ChildOutcome::FetchFailed),
                    }
                }
                Err(e) => return Err(e.into()),
            },
        };

        let records = extract_page(&html, &self.extract);
        let path = layout::records_path(&page);
        self.store
            .save_text(&path, &serde_json::to_string_pretty(&records)?)?;
        ledger.mark_parsed(link)?;

        tracing::info!(
            "Parsed {}: {} tracks, {} papers -> {}",
            page,
            records.len(),
            records.paper_count(),
            path.display()
        );

        Ok(ChildOutcome::Done {
            fetch,
            parse: ParseStep::Parsed,
        })
    }

    /// Fetches after the politeness pause, restarting the pause once the
    /// request is over
    async fn throttled_fetch(&mut self, url: &str) -> Result<String, FetchError> {
        self.throttle.wait().await;
        let result = self.fetcher.fetch(url).await;
        self.throttle.record_request(Instant::now());
        result
    }

    /// Fetches a page, saves its raw snapshot, and marks it fetched
    ///
    /// A failed fetch is logged and returned as `Ok(None)`; the page stays
    /// unmarked so the next run retries it. Storage failures are errors.
    async fn fetch_and_save(
        &mut self,
        ledger: &mut ResumeLedger,
        link: &str,
        page: &PageRef,
    ) -> Result<Option<String>, HarvestError> {
        let body = match self.throttled_fetch(link).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", link, e);
                return Ok(None);
            }
        };

        let path = layout::raw_snapshot_path(page);
        self.store.save_text(&path, &body)?;
        ledger.mark_fetched(link)?;
        tracing::debug!("Saved {} to {}", link, path.display());

        Ok(Some(body))
    }
}
