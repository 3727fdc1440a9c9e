use crate::extract::ExtractOptions;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for dblp-harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    /// Venue name → index page locator
    #[serde(default)]
    pub venues: BTreeMap<String, String>,
}

impl Config {
    /// Looks up a venue's index locator, ignoring case
    pub fn venue_locator(&self, name: &str) -> Option<&str> {
        self.venues
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, locator)| locator.as_str())
    }
}

/// HTTP fetching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum time between consecutive requests (milliseconds)
    #[serde(rename = "politeness-delay-ms", default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_politeness_delay_ms() -> u64 {
    1000
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory for ledgers and snapshots
    #[serde(rename = "root-dir")]
    pub root_dir: String,
}

/// Page extraction configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractConfig {
    /// Track name for publication lists that precede any track header
    #[serde(rename = "default-track")]
    pub default_track: Option<String>,
}

impl ExtractConfig {
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions {
            default_track: self.default_track.clone(),
        }
    }
}
