//! Keyword search over harvested records
//!
//! Search never touches the network. It walks a venue's parse ledger and reads
//! the record snapshot of every parsed page.

use crate::extract::{PageRecords, PaperRecord};
use crate::ledger::ResumeLedger;
use crate::locator::{resolve_page, VenueRef};
use crate::storage::{layout, StorageResult, Store};
use std::sync::Arc;

/// A title filter built from a keyword string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordQuery {
    /// Every term must appear
    All(Vec<String>),
    /// At least one term must appear
    Any(Vec<String>),
}

impl KeywordQuery {
    /// Parses `"a+b"` as an all-of query and `"a|b"` as an any-of query
    ///
    /// A lone keyword is an any-of query with one term. Terms are trimmed and
    /// lower-cased; empty terms are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use dblp_harvest::search::KeywordQuery;
    ///
    /// let query = KeywordQuery::parse("Graph+Neural");
    /// assert!(query.matches("Neural Networks on Graphs"));
    /// assert!(!query.matches("Graph Theory"));
    /// ```
    pub fn parse(query: &str) -> Self {
        if query.contains('+') {
            Self::All(split_terms(query, '+'))
        } else {
            Self::Any(split_terms(query, '|'))
        }
    }

    pub fn terms(&self) -> &[String] {
        match self {
            Self::All(terms) | Self::Any(terms) => terms,
        }
    }

    /// Case-insensitive substring test against a title
    ///
    /// A query without terms matches nothing.
    pub fn matches(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        match self {
            Self::All(terms) => {
                !terms.is_empty() && terms.iter().all(|t| title.contains(t.as_str()))
            }
            Self::Any(terms) => terms.iter().any(|t| title.contains(t.as_str())),
        }
    }
}

fn split_terms(query: &str, separator: char) -> Vec<String> {
    query
        .split(separator)
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// A paper that matched a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub page_name: String,
    pub track: String,
    pub paper: PaperRecord,
}

/// Searches the parsed pages of one venue
///
/// Pages are visited in parse ledger order. A page whose record snapshot is
/// missing or can't be decoded is logged and skipped.
///
/// # Returns
///
/// * `Ok(Vec<SearchHit>)` - Matching papers, grouped by page then track
/// * `Err(StorageError)` - The ledger could not be opened
pub fn search_venue(
    store: Arc<dyn Store>,
    venue: &VenueRef,
    query: &KeywordQuery,
) -> StorageResult<Vec<SearchHit>> {
    let ledger = ResumeLedger::open(store.clone(), venue)?;
    let mut hits = Vec::new();

    for link in ledger.parsed_links() {
        let page = match resolve_page(link) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Skipping ledger entry {}: {}", link, e);
                continue;
            }
        };

        let path = layout::records_path(&page);
        let records: PageRecords = match store
            .load_text(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| serde_json::from_str(&json).map_err(|e| e.to_string()))
        {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Skipping records of {}: {}", page, e);
                continue;
            }
        };

        for (track, papers) in records.iter() {
            for paper in papers.iter().filter(|p| query.matches(&p.title)) {
                hits.push(SearchHit {
                    page_name: page.page_name.clone(),
                    track: track.to_string(),
                    paper: paper.clone(),
                });
            }
        }
    }

    tracing::debug!("{}: {} hits for {:?}", venue, hits.len(), query);
    Ok(hits)
}
