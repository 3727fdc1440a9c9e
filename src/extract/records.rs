use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One author of a paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub name: String,

    /// Normalized profile identifier, e.g. `"12-345"`
    pub pid: Option<String>,
}

/// One paper listed on an edition page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub authors: Vec<AuthorRecord>,
}

/// A named section of an edition page and its papers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub name: String,
    pub papers: Vec<PaperRecord>,
}

/// Everything extracted from one edition page
///
/// Tracks keep document order. Serializes as a plain object of
/// track name → papers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRecords {
    tracks: IndexMap<String, Vec<PaperRecord>>,
}

impl PageRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a track, keeping its existing papers if the name was seen before
    pub fn open_track(&mut self, name: &str) {
        if !self.tracks.contains_key(name) {
            self.tracks.insert(name.to_string(), Vec::new());
        }
    }

    /// Appends a paper to a track, opening the track if needed
    pub fn push_paper(&mut self, track: &str, paper: PaperRecord) {
        self.open_track(track);
        if let Some(papers) = self.tracks.get_mut(track) {
            papers.push(paper);
        }
    }

    /// Papers of one track
    pub fn track(&self, name: &str) -> Option<&[PaperRecord]> {
        self.tracks.get(name).map(Vec::as_slice)
    }

    /// Track names in document order
    pub fn track_names(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Iterates `(track, papers)` in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PaperRecord])> {
        self.tracks
            .iter()
            .map(|(name, papers)| (name.as_str(), papers.as_slice()))
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total number of papers across all tracks
    pub fn paper_count(&self) -> usize {
        self.tracks.values().map(Vec::len).sum()
    }

    /// Consumes the set into owned track records, in document order
    pub fn into_tracks(self) -> Vec<TrackRecord> {
        self.tracks
            .into_iter()
            .map(|(name, papers)| TrackRecord { name, papers })
            .collect()
    }
}
