//! Locator handling module for dblp-harvest
//!
//! This module derives stable venue and page identities from DBLP-style
//! locators such as `https://dblp.org/db/conf/aaai/aaai2025.html`.

mod resolve;

use std::fmt;

pub use resolve::{resolve_page, resolve_venue};

/// Kind of publication venue
///
/// DBLP files conferences under `conf/` and journals under `journals/`. The set
/// is closed; anything else is rejected when a locator is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VenueType {
    /// Conference series
    Conf,
    /// Journal
    Journal,
}

impl VenueType {
    /// Returns the path segment used for this venue type
    pub fn as_segment(&self) -> &'static str {
        match self {
            Self::Conf => "conf",
            Self::Journal => "journals",
        }
    }

    /// Parses a venue type from its path segment
    ///
    /// Returns None if the segment doesn't name a known venue type.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "conf" => Some(Self::Conf),
            "journals" => Some(Self::Journal),
            _ => None,
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_segment())
    }
}

/// Identifies a top-level venue (one conference series or journal)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VenueRef {
    pub venue_type: VenueType,
    pub venue_name: String,
}

impl VenueRef {
    /// Storage slug for this venue, e.g. `conf-aaai`
    pub fn slug(&self) -> String {
        format!("{}-{}", self.venue_type, self.venue_name)
    }
}

impl fmt::Display for VenueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.venue_type, self.venue_name)
    }
}

/// Identifies one edition or volume page within a venue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRef {
    pub venue_type: VenueType,
    pub venue_name: String,
    pub page_name: String,
}

impl PageRef {
    /// The venue this page belongs to
    pub fn venue(&self) -> VenueRef {
        VenueRef {
            venue_type: self.venue_type,
            venue_name: self.venue_name.clone(),
        }
    }

    /// Returns true if the page name starts with the venue name
    ///
    /// Index pages sometimes link to editions of sibling venues
    /// (`conf/aaai/index.html` → `conf/iaai/iaai2024.html`); this is the check
    /// used to filter those out.
    pub fn matches_venue_prefix(&self) -> bool {
        self.page_name.starts_with(&self.venue_name)
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.venue_type, self.venue_name, self.page_name
        )
    }
}
