//! Error types for the redocx library.

use std::io;
use thiserror::Error;

/// Result type alias for redocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not a ZIP-packaged OOXML document.
    #[error("Unknown file format: not a DOCX package")]
    UnknownFormat,

    /// The package is a ZIP archive but not a usable Word document.
    #[error("Invalid DOCX package: {0}")]
    InvalidPackage(String),

    /// A required package part is missing (e.g., `word/document.xml`).
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Error parsing a part's XML.
    #[error("XML parsing error in {part}: {message}")]
    Xml {
        /// Package part the error occurred in.
        part: String,
        /// Underlying parser message.
        message: String,
    },

    /// The known-authors side file could not be loaded.
    #[error("Failed to load known authors: {0}")]
    AuthorsLoad(String),

    /// The template lacks a style the composer requires.
    ///
    /// No fallback style is substituted; the conversion aborts.
    #[error("Template is missing required style \"{0}\"")]
    StyleNotFound(String),

    /// Error writing the output package.
    #[error("Failed to save document: {0}")]
    Save(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an [`Error::Xml`] for a given package part.
    pub(crate) fn xml(part: &str, err: roxmltree::Error) -> Self {
        Error::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::FileNotFound => {
                Error::MissingPart("file not found in archive".into())
            }
            _ => Error::InvalidPackage(err.to_string()),
        }
    }
}
