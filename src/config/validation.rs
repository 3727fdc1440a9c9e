use crate::config::types::{Config, ExtractConfig, FetcherConfig, StorageConfig};
use crate::locator::resolve_venue;
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::BTreeMap;
use url::Url;

const MAX_TIMEOUT_SECS: u64 = 300;
const MIN_POLITENESS_DELAY_MS: u64 = 100;
const MAX_POLITENESS_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_storage_config(&config.storage)?;
    validate_extract_config(&config.extract)?;
    validate_venues(&config.venues)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if HeaderValue::from_str(&config.user_agent).is_err() {
        return Err(ConfigError::Validation(format!(
            "user-agent is not a valid header value: '{}'",
            config.user_agent
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if config.politeness_delay_ms < MIN_POLITENESS_DELAY_MS
        || config.politeness_delay_ms > MAX_POLITENESS_DELAY_MS
    {
        return Err(ConfigError::Validation(format!(
            "politeness-delay-ms must be between {}ms and {}ms, got {}ms",
            MIN_POLITENESS_DELAY_MS, MAX_POLITENESS_DELAY_MS, config.politeness_delay_ms
        )));
    }

    validate_headers(&config.headers)
}

/// Validates extra request headers
fn validate_headers(headers: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    for (name, value) in headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid header name '{}'",
                name
            )));
        }

        if HeaderValue::from_str(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid value for header '{}'",
                name
            )));
        }
    }
    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.root_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "root-dir cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates extraction configuration
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    if let Some(track) = &config.default_track {
        if track.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default-track cannot be blank; omit it to skip untracked lists".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validates the venue table
///
/// Names are matched case-insensitively at lookup time, so two names that only
/// differ in case are rejected here.
fn validate_venues(venues: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();

    for (name, locator) in venues {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Venue name cannot be empty".to_string(),
            ));
        }

        if let Some(previous) = seen.insert(name.to_ascii_uppercase(), name) {
            return Err(ConfigError::Validation(format!(
                "Venue names '{}' and '{}' differ only in case",
                previous, name
            )));
        }

        let url = Url::parse(locator).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid index URL for venue '{}': {}", name, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Index URL for venue '{}' must use HTTP(S), got '{}'",
                name, locator
            )));
        }

        resolve_venue(locator).map_err(|e| {
            ConfigError::Validation(format!("Venue '{}' has an unusable index URL: {}", name, e))
        })?;
    }

    Ok(())
}
