//! DOCX extraction module (the pipeline's first stage).

mod docx_parser;
mod frames;

pub use docx_parser::DocxParser;
