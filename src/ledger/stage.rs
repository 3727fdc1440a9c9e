/// Stage definitions for the resume ledger
use crate::locator::VenueRef;
use crate::storage::layout;
use std::fmt;
use std::path::PathBuf;

/// A unit of work a page goes through
///
/// Each stage has its own persisted mapping, and the two are updated
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Raw page body has been downloaded and saved
    Fetched,

    /// Records have been extracted from the saved body and written out
    Parsed,
}

impl Stage {
    /// Where this stage's mapping lives for a venue
    pub fn ledger_path(&self, venue: &VenueRef) -> PathBuf {
        match self {
            Self::Fetched => layout::fetch_ledger_path(venue),
            Self::Parsed => layout::parse_ledger_path(venue),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetched => "fetched",
            Self::Parsed => "parsed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
