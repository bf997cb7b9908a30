//! # redocx
//!
//! House-style normalizer for Word documents.
//!
//! This library extracts the content of a DOCX file into a structured form
//! (title, author, typed content blocks) and re-emits it as a fresh DOCX
//! built on a style template, discarding the source document's ad-hoc
//! formatting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use redocx::{convert_file, ConvertOptions};
//!
//! fn main() -> redocx::Result<()> {
//!     let options = ConvertOptions::new()
//!         .with_template("styles.docx")
//!         .with_authors_file("authors.json")?;
//!
//!     let report = convert_file("draft.docx", "clean.docx", &options)?;
//!     println!("{} blocks carried over", report.blocks);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction**: [`DocxParser`] reads the package, collects floating
//!   text frames for title detection, and walks the body into
//!   [`ContentBlock`]s.
//! - **Classification**: pure heuristics in [`classify`] pick the title,
//!   detect Title-Case headings, and match known author names.
//! - **Composition**: [`DocxWriter`] re-emits the blocks through a
//!   [`Template`], so the output carries only the template's styles.

pub mod classify;
pub mod compose;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;

pub(crate) mod ooxml;

// Re-export commonly used types
pub use classify::KnownAuthors;
pub use compose::{DocxWriter, StyleIds, Template};
pub use convert::{convert_bytes, convert_file, Conversion, ConvertOptions};
pub use detect::{detect_docx_from_bytes, detect_docx_from_path, is_docx};
pub use error::{Error, Result};
pub use model::{ContentBlock, HeadingLevel, ParsedDocument, Run, TableCell, TableRow};
pub use parser::DocxParser;

use std::io::Read;
use std::path::Path;

/// Parse a DOCX file and return its structured content.
///
/// Uses an empty known-authors list; author detection always comes up
/// empty and no heading is vetoed by an author name.
///
/// # Example
///
/// ```no_run
/// use redocx::parse_file;
///
/// let doc = parse_file("draft.docx").unwrap();
/// println!("{} blocks", doc.block_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    let mut parser = DocxParser::open(path)?;
    parser.parse(&KnownAuthors::empty())
}

/// Parse a DOCX file with a known-authors list.
pub fn parse_file_with_authors<P: AsRef<Path>>(
    path: P,
    authors: &KnownAuthors,
) -> Result<ParsedDocument> {
    let mut parser = DocxParser::open(path)?;
    parser.parse(authors)
}

/// Parse a DOCX from bytes.
///
/// # Example
///
/// ```no_run
/// use redocx::parse_bytes;
///
/// let data = std::fs::read("draft.docx").unwrap();
/// let doc = parse_bytes(&data).unwrap();
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<ParsedDocument> {
    let mut parser = DocxParser::from_bytes(data)?;
    parser.parse(&KnownAuthors::empty())
}

/// Parse a DOCX from a reader.
pub fn parse_reader<R: Read>(reader: R) -> Result<ParsedDocument> {
    let mut parser = DocxParser::from_reader(reader)?;
    parser.parse(&KnownAuthors::empty())
}

/// Builder for configuring and running conversions.
///
/// A thin wrapper over [`ConvertOptions`] for callers that prefer one
/// chained expression.
///
/// # Example
///
/// ```no_run
/// use redocx::Redocx;
///
/// let report = Redocx::new()
///     .with_template("styles.docx")
///     .with_authors_file("authors.json")?
///     .convert("draft.docx", "clean.docx")?;
/// # Ok::<(), redocx::Error>(())
/// ```
pub struct Redocx {
    options: ConvertOptions,
}

impl Redocx {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::new(),
        }
    }

    /// Set the style template path.
    pub fn with_template(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.options = self.options.with_template(path);
        self
    }

    /// Set the known author list.
    pub fn with_authors(mut self, authors: KnownAuthors) -> Self {
        self.options = self.options.with_authors(authors);
        self
    }

    /// Load the known author list from a JSON file.
    pub fn with_authors_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.options = self.options.with_authors_file(path)?;
        Ok(self)
    }

    /// Run a conversion.
    pub fn convert<P, Q>(&self, input: P, output: Q) -> Result<Conversion>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        convert_file(input, output, &self.options)
    }

    /// Parse only, without composing output.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<ParsedDocument> {
        parse_file_with_authors(path, &self.options.authors)
    }
}

impl Default for Redocx {
    fn default() -> Self {
        Self::new()
    }
}
