//! Document composition: template handling and DOCX emission.

mod docx_writer;
mod template;
mod xml;

pub use docx_writer::DocxWriter;
pub use template::{StyleIds, Template};
