//! Document-level types.

use super::ContentBlock;
use serde::{Deserialize, Serialize};

/// The structured result of extracting one source document.
///
/// Held entirely in memory, consumed exactly once by the composer, then
/// discarded. Block order is exactly the source body's traversal order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Best-guess title from the floating text frames (possibly empty)
    pub title: String,

    /// Best-guess author, when a known name was found in the opening
    /// paragraphs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Content blocks in source order
    pub blocks: Vec<ContentBlock>,
}

impl ParsedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of content blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of plain paragraph blocks.
    pub fn paragraph_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_paragraph()).count()
    }

    /// Number of table blocks.
    pub fn table_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, ContentBlock::Table { .. }))
            .count()
    }

    /// Check if the document has no content blocks.
    ///
    /// An empty title and absent author are valid states, not errors; a
    /// document is only "empty" when it has nothing to re-emit.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Plain text of the whole document, blocks joined by blank lines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
