//! Structural extraction from DBLP pages
//!
//! This module turns fetched HTML into data:
//! - Edition pages into ordered track → paper → author records
//! - Venue index pages into the list of edition locators
//! - Author profile links into normalized PIDs
//!
//! Everything here is pure; nothing touches the network or the store.

mod index;
mod page;
mod pid;
mod records;

pub use index::extract_child_links;
pub use page::{extract_document, extract_page, ExtractOptions};
pub use pid::normalize_pid;
pub use records::{AuthorRecord, PageRecords, PaperRecord, TrackRecord};
