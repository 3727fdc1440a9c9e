//! Storage module for persisting harvest data
//!
//! This module handles everything that outlives a run:
//! - Resume ledgers (which pages were fetched and parsed)
//! - Raw HTML snapshots of fetched pages
//! - Extracted record snapshots
//!
//! Backends implement [`Store`]; [`FsStore`] is the one used by the binary.

mod fs;
pub mod layout;
mod memory;
mod traits;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use traits::{StorageError, StorageResult, Store};

use crate::config::StorageConfig;
use std::sync::Arc;

/// Opens the store described by the configuration
///
/// # Arguments
///
/// * `config` - The storage section of the configuration
///
/// # Returns
///
/// A shareable handle to a filesystem store rooted at `root-dir`
pub fn open_store(config: &StorageConfig) -> Arc<dyn Store> {
    let store = FsStore::new(&config.root_dir);
    tracing::debug!("Storing harvest data under {}", store.root().display());
    Arc::new(store)
}
