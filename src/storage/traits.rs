//! Storage traits and error types
//!
//! This module defines the trait interface for persistence backends and
//! associated error types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Returns true if the requested entry does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for persistence backends
///
/// Paths are relative to the backend's root. Implementations take `&self` so a
/// single store can be shared between the crawler and the ledgers it opens.
pub trait Store: Send + Sync {
    /// Loads a link → flag mapping
    ///
    /// A mapping that was never saved loads as empty.
    fn load_mapping(&self, path: &Path) -> StorageResult<BTreeMap<String, bool>>;

    /// Replaces the mapping stored at `path`
    fn save_mapping(&self, path: &Path, mapping: &BTreeMap<String, bool>) -> StorageResult<()>;

    /// Loads a text document
    ///
    /// Returns `StorageError::NotFound` if nothing was saved at `path`.
    fn load_text(&self, path: &Path) -> StorageResult<String>;

    /// Replaces the text document stored at `path`
    fn save_text(&self, path: &Path, content: &str) -> StorageResult<()>;
}

/// Encodes a mapping as a TOML document
pub(crate) fn encode_mapping(
    path: &Path,
    mapping: &BTreeMap<String, bool>,
) -> StorageResult<String> {
    toml::to_string(mapping).map_err(|e| StorageError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Decodes a mapping from a TOML document
pub(crate) fn decode_mapping(path: &Path, content: &str) -> StorageResult<BTreeMap<String, bool>> {
    toml::from_str(content).map_err(|e| StorageError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
