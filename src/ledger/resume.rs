use crate::ledger::Stage;
use crate::locator::VenueRef;
use crate::storage::{StorageResult, Store};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tracks which pages of one venue have been fetched and parsed
///
/// Both mappings are loaded at open time. Every `mark_*` call writes the whole
/// mapping for that stage back to the store before returning, so the durable
/// copy is never more than one unit behind.
///
/// The ledger does not check that a parsed link was also fetched; callers mark
/// `Fetched` before `Parsed`.
pub struct ResumeLedger {
    store: Arc<dyn Store>,
    scope: VenueRef,
    fetched: BTreeMap<String, bool>,
    parsed: BTreeMap<String, bool>,
}

impl ResumeLedger {
    /// Opens the ledger for a venue
    ///
    /// Missing ledger files are treated as empty. A ledger file that exists but
    /// cannot be read or decoded is an error.
    pub fn open(store: Arc<dyn Store>, scope: &VenueRef) -> StorageResult<Self> {
        let fetched = store.load_mapping(&Stage::Fetched.ledger_path(scope))?;
        let parsed = store.load_mapping(&Stage::Parsed.ledger_path(scope))?;

        tracing::debug!(
            "Opened ledger for {}: {} fetched, {} parsed",
            scope,
            fetched.len(),
            parsed.len()
        );

        Ok(Self {
            store,
            scope: scope.clone(),
            fetched,
            parsed,
        })
    }

    /// The venue this ledger belongs to
    pub fn scope(&self) -> &VenueRef {
        &self.scope
    }

    pub fn is_fetched(&self, link: &str) -> bool {
        self.is_done(Stage::Fetched, link)
    }

    pub fn is_parsed(&self, link: &str) -> bool {
        self.is_done(Stage::Parsed, link)
    }

    /// Records that `link` has been fetched and persists the fetch ledger
    pub fn mark_fetched(&mut self, link: &str) -> StorageResult<()> {
        self.mark(Stage::Fetched, link)
    }

    /// Records that `link` has been parsed and persists the parse ledger
    pub fn mark_parsed(&mut self, link: &str) -> StorageResult<()> {
        self.mark(Stage::Parsed, link)
    }

    /// Returns true if `link` has completed `stage`
    pub fn is_done(&self, stage: Stage, link: &str) -> bool {
        self.mapping(stage).get(link).copied().unwrap_or(false)
    }

    /// Number of links that have completed `stage`
    pub fn count(&self, stage: Stage) -> usize {
        self.mapping(stage).values().filter(|done| **done).count()
    }

    pub fn fetched_count(&self) -> usize {
        self.count(Stage::Fetched)
    }

    pub fn parsed_count(&self) -> usize {
        self.count(Stage::Parsed)
    }

    /// Links whose records have been written, in ledger order
    pub fn parsed_links(&self) -> impl Iterator<Item = &str> {
        self.parsed
            .iter()
            .filter(|(_, done)| **done)
            .map(|(link, _)| link.as_str())
    }

    fn mapping(&self, stage: Stage) -> &BTreeMap<String, bool> {
        match stage {
            Stage::Fetched => &self.fetched,
            Stage::Parsed => &self.parsed,
        }
    }

    /// Sets the entry and writes the stage's mapping through
    ///
    /// On a failed write the in-memory entry stays set; the caller must treat
    /// the unit as unresolved.
    fn mark(&mut self, stage: Stage, link: &str) -> StorageResult<()> {
        let mapping = match stage {
            Stage::Fetched => &mut self.fetched,
            Stage::Parsed => &mut self.parsed,
        };
        mapping.insert(link.to_string(), true);

        let path = stage.ledger_path(&self.scope);
        self.store.save_mapping(&path, mapping)?;
        tracing::trace!("Marked {} as {} in {}", link, stage, path.display());
        Ok(())
    }
}
