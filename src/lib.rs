//! dblp-harvest: an incremental DBLP venue harvester
//!
//! This crate walks a venue index page, fetches every edition page it links to,
//! and extracts a track → paper → author record set from each one. A per-venue
//! resume ledger records which pages have been fetched and parsed, so repeated
//! runs only do the work that is still missing.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod ledger;
pub mod locator;
pub mod search;
pub mod storage;

use thiserror::Error;

/// Main error type for dblp-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Locator error: {0}")]
    Locator(#[from] LocatorError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown venue: {0}")]
    UnknownVenue(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while deriving venue/page identities from a locator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("Malformed locator: {0}")]
    Malformed(String),

    #[error("Unknown venue type '{kind}' in locator {locator}")]
    UnknownVenueType { kind: String, locator: String },
}

/// Result type alias for dblp-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for locator operations
pub type LocatorResult<T> = std::result::Result<T, LocatorError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{AuthorRecord, PageRecords, PaperRecord, TrackRecord};
pub use ledger::ResumeLedger;
pub use locator::{resolve_page, resolve_venue, PageRef, VenueRef, VenueType};
