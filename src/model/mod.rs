//! Intermediate representation of a parsed document.
//!
//! The extractor produces these types; the composer consumes them. Nothing
//! here knows about the OOXML container.

mod block;
mod document;

pub use block::{ContentBlock, HeadingLevel, Run, TableCell, TableRow};
pub use document::ParsedDocument;
