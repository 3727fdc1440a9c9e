use crate::storage::traits::{decode_mapping, encode_mapping, StorageError, StorageResult, Store};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// In-memory store, used by tests
///
/// Mappings go through the same TOML encoding as [`FsStore`](super::FsStore),
/// so anything that round-trips here round-trips on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, String>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns true if something has been saved at `path`
    pub fn contains(&self, path: &Path) -> bool {
        self.entries().contains_key(path)
    }

    /// Removes the entry at `path`, returning its content
    pub fn remove(&self, path: &Path) -> Option<String> {
        self.entries().remove(path)
    }
}

impl Store for MemoryStore {
    fn load_mapping(&self, path: &Path) -> StorageResult<BTreeMap<String, bool>> {
        match self.entries().get(path) {
            Some(content) => decode_mapping(path, content),
            None => Ok(BTreeMap::new()),
        }
    }

    fn save_mapping(&self, path: &Path, mapping: &BTreeMap<String, bool>) -> StorageResult<()> {
        let content = encode_mapping(path, mapping)?;
        self.entries().insert(path.to_path_buf(), content);
        Ok(())
    }

    fn load_text(&self, path: &Path) -> StorageResult<String> {
        self.entries()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    fn save_text(&self, path: &Path, content: &str) -> StorageResult<()> {
        self.entries()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}
