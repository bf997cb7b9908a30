//! End-to-end conversion: extract a source document and re-emit it through
//! a style template.
//!
//! # Example
//!
//! ```no_run
//! use redocx::convert::{convert_file, ConvertOptions};
//!
//! fn main() -> redocx::Result<()> {
//!     let options = ConvertOptions::new().with_authors_file("authors.json")?;
//!     let report = convert_file("in.docx", "out.docx", &options)?;
//!     println!("title: {}", report.title);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::classify::KnownAuthors;
use crate::compose::{DocxWriter, Template};
use crate::error::Result;
use crate::parser::DocxParser;

/// Options for document conversion.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Path to the style template; `None` uses the built-in template
    pub template: Option<PathBuf>,

    /// Known author names for byline detection
    pub authors: KnownAuthors,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style template path.
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    /// Set the known author list.
    pub fn with_authors(mut self, authors: KnownAuthors) -> Self {
        self.authors = authors;
        self
    }

    /// Load the known author list from a JSON file.
    pub fn with_authors_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.authors = KnownAuthors::from_file(path)?;
        Ok(self)
    }

    fn template(&self) -> Result<Template> {
        match &self.template {
            Some(path) => Template::open(path),
            None => Ok(Template::builtin()),
        }
    }
}

/// Report of a completed conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Detected title (possibly empty)
    pub title: String,

    /// Detected author, if any
    pub author: Option<String>,

    /// Number of content blocks carried over
    pub blocks: usize,

    /// Number of plain paragraphs among them
    pub paragraphs: usize,

    /// Number of tables among them
    pub tables: usize,
}

/// Convert one document file, writing the normalized output to `output`.
pub fn convert_file<P, Q>(input: P, output: Q, options: &ConvertOptions) -> Result<Conversion>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let template = options.template()?;
    let mut parser = DocxParser::open(&input)?;
    let doc = parser.parse(&options.authors)?;

    log::info!(
        "{}: {} blocks, title {:?}",
        input.as_ref().display(),
        doc.block_count(),
        doc.title
    );

    DocxWriter::new(template).write(&doc, output)?;

    Ok(Conversion {
        title: doc.title.clone(),
        author: doc.author.clone(),
        blocks: doc.block_count(),
        paragraphs: doc.paragraph_count(),
        tables: doc.table_count(),
    })
}

/// Convert document bytes, returning the output package bytes and report.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<(Vec<u8>, Conversion)> {
    let template = options.template()?;
    let mut parser = DocxParser::from_bytes(data)?;
    let doc = parser.parse(&options.authors)?;

    let bytes = DocxWriter::new(template).to_bytes(&doc)?;
    let report = Conversion {
        title: doc.title.clone(),
        author: doc.author.clone(),
        blocks: doc.block_count(),
        paragraphs: doc.paragraph_count(),
        tables: doc.table_count(),
    };
    Ok((bytes, report))
}
