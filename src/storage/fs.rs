use crate::storage::traits::{decode_mapping, encode_mapping, StorageError, StorageResult, Store};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem-backed store rooted at a configured directory
///
/// Every save writes to a temporary sibling first and renames it into place,
/// so an interrupted run never leaves a half-written ledger or snapshot.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Creates a store rooted at `root`
    ///
    /// The directory is created lazily on the first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn write_atomic(&self, path: &Path, content: &str) -> StorageResult<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let mut tmp_name = full.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = full.with_file_name(tmp_name);

        fs::write(&tmp, content).map_err(|e| StorageError::io(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &full) {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::io(&full, e));
        }
        Ok(())
    }
}

impl Store for FsStore {
    fn load_mapping(&self, path: &Path) -> StorageResult<BTreeMap<String, bool>> {
        match self.load_text(path) {
            Ok(content) => decode_mapping(path, &content),
            Err(e) if e.is_not_found() => Ok(BTreeMap::new()),
            Err(e) => Err(e),
        }
    }

    fn save_mapping(&self, path: &Path, mapping: &BTreeMap<String, bool>) -> StorageResult<()> {
        let content = encode_mapping(path, mapping)?;
        self.write_atomic(path, &content)
    }

    fn load_text(&self, path: &Path) -> StorageResult<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).map_err(|e| StorageError::io(&full, e))
    }

    fn save_text(&self, path: &Path, content: &str) -> StorageResult<()> {
        self.write_atomic(path, content)
    }
}
