//! Heuristic classification of document text.
//!
//! All functions here are pure: they operate on plain text and the
//! known-authors list, never on a document object, so every decision the
//! pipeline makes is unit-testable in isolation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Byline marker that disqualifies a text frame from being the title.
const BYLINE_MARKER: &str = "an article by";

/// A title candidate frame must have fewer words than this.
const MAX_TITLE_WORDS: usize = 15;

/// Heading candidates longer than this many words are rejected.
const HEADING_MAX_WORDS: usize = 10;

/// Minimum fraction of Title-Case words for a heading.
const HEADING_TITLE_CASE_RATIO: f64 = 0.75;

/// Author detection scans at most this many paragraph blocks.
const AUTHOR_SCAN_PARAGRAPHS: usize = 3;

/// Canonical author names used to veto heading classification and to fill
/// in the document author field.
///
/// Loaded once per process, read-only afterwards. The list is ordered:
/// when several names match, the first one wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownAuthors {
    names: Vec<String>,
}

impl KnownAuthors {
    /// An empty author list. Heading detection still works; author
    /// detection always comes up empty.
    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    /// Build from a list of canonical names.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Load the JSON side file (a flat array of name strings).
    ///
    /// A missing or malformed file is an error: author matching is part of
    /// the conversion contract, so a driver that wants no author matching
    /// must pass [`KnownAuthors::empty`] explicitly.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref()).map_err(|e| {
            Error::AuthorsLoad(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_slice(&data)
    }

    /// Parse the authors list from JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let names: Vec<String> =
            serde_json::from_slice(data).map_err(|e| Error::AuthorsLoad(e.to_string()))?;
        Ok(Self { names })
    }

    /// Number of known names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate the canonical names in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// True when any known name appears in `text` (case-insensitive).
    pub fn matches_any(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.names.iter().any(|a| lower.contains(&a.to_lowercase()))
    }

    /// First known name appearing in `text` (case-insensitive), in its
    /// canonical capitalization.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.names
            .iter()
            .find(|a| lower.contains(&a.to_lowercase()))
            .map(String::as_str)
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pick the most likely title from floating text frame texts.
///
/// Frames are visited in document order. The first frame that is not a
/// byline (does not contain "an article by", any case) and is short enough
/// to be a title (fewer than 15 words) wins. Returns the empty string when
/// no frame qualifies.
pub fn choose_title<'a, I>(frames: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    for text in frames {
        if text.to_lowercase().contains(BYLINE_MARKER) {
            log::debug!("skipping byline frame: {:?}", text);
            continue;
        }
        if text.split_whitespace().count() < MAX_TITLE_WORDS {
            return normalize_whitespace(text);
        }
    }
    String::new()
}

/// Title-Case heading detector.
///
/// A paragraph is a heading when at least 75% of its words start with an
/// uppercase letter, it has between 1 and 10 words, and it does not contain
/// a known author name (bylines are the dominant false positive). This is a
/// purely syntactic check; misclassifications are expected and are not an
/// error condition.
pub fn is_title_case_heading(text: &str, authors: &KnownAuthors) -> bool {
    if authors.matches_any(text) {
        return false;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || words.len() > HEADING_MAX_WORDS {
        return false;
    }

    let title_case = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    title_case as f64 / words.len() as f64 >= HEADING_TITLE_CASE_RATIO
}

/// Find a known author name in the opening paragraphs.
///
/// Only the first 3 paragraph texts are searched, joined and lowercased;
/// a byline buried deeper in the document is deliberately not found.
pub fn detect_author<'a, I>(paragraphs: I, authors: &KnownAuthors) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let search_text = paragraphs
        .into_iter()
        .take(AUTHOR_SCAN_PARAGRAPHS)
        .collect::<Vec<_>>()
        .join(" ");
    authors.find_in(&search_text).map(String::from)
}
