//! Per-venue run summaries

use crate::locator::VenueRef;
use chrono::{DateTime, Utc};

/// How a single edition page was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
    /// Skipped by the strict-prefix filter before any work
    Filtered,

    /// Network fetch failed; nothing was marked
    FetchFailed,

    /// All required steps completed
    Done { fetch: FetchStep, parse: ParseStep },
}

/// What happened to the fetch step of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStep {
    /// Downloaded and saved in this run
    Fetched,
    /// Already fetched in an earlier run
    Skipped,
}

/// What happened to the parse step of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStep {
    /// Records extracted and saved in this run
    Parsed,
    /// Already parsed in an earlier run
    Skipped,
    /// Parsing disabled for this run
    Disabled,
}

/// Summary of one venue run
#[derive(Debug, Clone)]
pub struct VenueReport {
    pub venue: VenueRef,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// False if the index page could not be fetched
    pub index_fetched: bool,

    /// Edition pages listed on the index
    pub pages_total: usize,

    pub fetched: usize,
    pub fetch_skipped: usize,
    pub parsed: usize,
    pub parse_skipped: usize,
    pub filtered: usize,
    pub fetch_failures: usize,

    /// Units aborted by storage, locator or snapshot errors
    pub errors: usize,
}

impl VenueReport {
    pub fn new(venue: VenueRef) -> Self {
        Self {
            venue,
            started_at: Utc::now(),
            finished_at: None,
            index_fetched: false,
            pages_total: 0,
            fetched: 0,
            fetch_skipped: 0,
            parsed: 0,
            parse_skipped: 0,
            filtered: 0,
            fetch_failures: 0,
            errors: 0,
        }
    }

    /// Counts one page outcome
    pub fn record(&mut self, outcome: ChildOutcome) {
        match outcome {
            ChildOutcome::Filtered => self.filtered += 1,
            ChildOutcome::FetchFailed => self.fetch_failures += 1,
            ChildOutcome::Done { fetch, parse } => {
                match fetch {
                    FetchStep::Fetched => self.fetched += 1,
                    FetchStep::Skipped => self.fetch_skipped += 1,
                }
                match parse {
                    ParseStep::Parsed => self.parsed += 1,
                    ParseStep::Skipped => self.parse_skipped += 1,
                    ParseStep::Disabled => {}
                }
            }
        }
    }

    /// Counts one aborted page
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the run, once finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }

    /// True if every listed page ended without a failure
    pub fn is_clean(&self) -> bool {
        self.index_fetched && self.fetch_failures == 0 && self.errors == 0
    }

    /// Logs the summary at info level
    pub fn log_summary(&self) {
        if !self.index_fetched {
            tracing::warn!("{}: index unavailable, nothing crawled", self.venue);
            return;
        }

        let seconds = self
            .duration()
            .map(|d| d.num_milliseconds() as f64 / 1000.0)
            .unwrap_or_default();

        tracing::info!(
            "{}: {} pages ({} fetched, {} already fetched, {} parsed, {} already parsed, {} filtered) in {:.1}s",
            self.venue,
            self.pages_total,
            self.fetched,
            self.fetch_skipped,
            self.parsed,
            self.parse_skipped,
            self.filtered,
            seconds
        );

        if self.fetch_failures > 0 || self.errors > 0 {
            tracing::warn!(
                "{}: {} fetch failures, {} errors; rerun to retry",
                self.venue,
                self.fetch_failures,
                self.errors
            );
        }
    }
}
