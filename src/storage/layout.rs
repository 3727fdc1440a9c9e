//! On-disk layout of a harvest
//!
//! ```text
//! <root>/<type>-<name>/.meta.download.toml   fetch ledger
//! <root>/<type>-<name>/.meta.parse.toml      parse ledger
//! <root>/<type>-<name>/<page>.html           raw snapshot
//! <root>/<type>-<name>/<page>.json           extracted records
//! ```

use crate::locator::{PageRef, VenueRef};
use std::path::PathBuf;

const FETCH_LEDGER_FILE: &str = ".meta.download.toml";
const PARSE_LEDGER_FILE: &str = ".meta.parse.toml";

/// Directory holding everything for one venue
pub fn venue_dir(venue: &VenueRef) -> PathBuf {
    PathBuf::from(venue.slug())
}

/// Ledger of fetched pages for a venue
pub fn fetch_ledger_path(venue: &VenueRef) -> PathBuf {
    venue_dir(venue).join(FETCH_LEDGER_FILE)
}

/// Ledger of parsed pages for a venue
pub fn parse_ledger_path(venue: &VenueRef) -> PathBuf {
    venue_dir(venue).join(PARSE_LEDGER_FILE)
}

/// Raw HTML snapshot of a page
pub fn raw_snapshot_path(page: &PageRef) -> PathBuf {
    venue_dir(&page.venue()).join(format!("{}.html", page.page_name))
}

/// Extracted record snapshot of a page
pub fn records_path(page: &PageRef) -> PathBuf {
    venue_dir(&page.venue()).join(format!("{}.json", page.page_name))
}
