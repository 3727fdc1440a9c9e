//! Ledger module for tracking harvest progress
//!
//! A resume ledger records, per venue, which edition pages have been fetched
//! and which have been parsed. It is loaded when a venue run starts and written
//! back after every change, so an interrupted run loses at most the unit that
//! was in flight.
//!
//! # Components
//!
//! - `Stage`: the two independent dimensions the ledger tracks
//! - `ResumeLedger`: the per-venue ledger itself

mod resume;
mod stage;

pub use resume::ResumeLedger;
pub use stage::Stage;
