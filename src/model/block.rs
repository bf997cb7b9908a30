//! Content block and run-level types.

use serde::{Deserialize, Serialize};

/// A contiguous span of text sharing one formatting state.
///
/// Formatting flags are tri-state: `Some(true)` / `Some(false)` are explicit
/// toggles, `None` means unspecified (inherited from a style). The composer
/// treats `None` as "apply nothing", which matters for hyperlink runs whose
/// look comes entirely from the `Hyperlink` character style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The text content
    pub text: String,

    /// Bold toggle, if specified
    pub bold: Option<bool>,

    /// Italic toggle, if specified
    pub italic: Option<bool>,

    /// Underline toggle, if specified
    pub underline: Option<bool>,

    /// Hyperlink target URL, if this run is link display text
    pub hyperlink: Option<String>,
}

impl Run {
    /// Create a plain run with no formatting specified.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Create a run with explicit formatting toggles.
    pub fn formatted(
        text: impl Into<String>,
        bold: Option<bool>,
        italic: Option<bool>,
        underline: Option<bool>,
    ) -> Self {
        Self {
            text: text.into(),
            bold,
            italic,
            underline,
            hyperlink: None,
        }
    }

    /// Create a hyperlink run.
    ///
    /// Hyperlink runs carry no independent formatting; styling is supplied
    /// by the `Hyperlink` character style at emission time.
    pub fn hyperlink(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: None,
            italic: None,
            underline: None,
            hyperlink: Some(url.into()),
        }
    }

    /// Check if this run is link display text.
    pub fn is_hyperlink(&self) -> bool {
        self.hyperlink.is_some()
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Heading depth the composer can emit.
///
/// The Title-Case heuristic only ever produces [`HeadingLevel::H2`]; `H3`
/// exists so the block vocabulary covers every style the template supplies,
/// and is only reachable by constructing blocks directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    /// Section heading ("Heading 2")
    H2,
    /// Sub-section heading ("Heading 3")
    H3,
}

/// A table row: an ordered sequence of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a row from cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
    }

    /// Number of cells in this row.
    pub fn width(&self) -> usize {
        self.cells.len()
    }
}

/// A table cell: an ordered sequence of runs.
///
/// Cell runs never carry hyperlinks; the extractor does not resolve
/// relationships inside tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Runs in the cell, in source order
    pub runs: Vec<Run>,
}

impl TableCell {
    /// Create a cell from runs.
    pub fn new(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Create a cell holding a single plain-text run.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::new(text)],
        }
    }

    /// Get plain text content of the cell.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A typed content block, in document-body order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// A detected heading with literal text (run formatting is not kept)
    Heading {
        /// Heading text
        text: String,
        /// Heading depth
        level: HeadingLevel,
    },

    /// A body paragraph
    Paragraph {
        /// Trimmed paragraph text
        text: String,
        /// Runs in source order
        runs: Vec<Run>,
    },

    /// A list item (any numbering format; ordered and unordered alike)
    ListItem {
        /// Trimmed paragraph text
        text: String,
        /// Runs in source order
        runs: Vec<Run>,
    },

    /// A table
    Table {
        /// Rows in source order; rows may be ragged
        rows: Vec<TableRow>,
    },
}

impl ContentBlock {
    /// Create a level-2 heading block.
    pub fn heading2(text: impl Into<String>) -> Self {
        ContentBlock::Heading {
            text: text.into(),
            level: HeadingLevel::H2,
        }
    }

    /// Plain text of the block. Table text joins cells with tabs and rows
    /// with newlines.
    pub fn plain_text(&self) -> String {
        match self {
            ContentBlock::Heading { text, .. } => text.clone(),
            ContentBlock::Paragraph { text, .. } | ContentBlock::ListItem { text, .. } => {
                text.clone()
            }
            ContentBlock::Table { rows } => rows
                .iter()
                .map(|row| {
                    row.cells
                        .iter()
                        .map(|c| c.plain_text())
                        .collect::<Vec<_>>()
                        .join("\t")
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Check if this block is a plain paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, ContentBlock::Paragraph { .. })
    }
}
