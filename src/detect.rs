//! DOCX container detection and validation.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

/// ZIP local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// The part every Word document package must carry.
const MAIN_PART: &str = "word/document.xml";

/// Validate that a file is a DOCX package.
///
/// Checks the ZIP magic bytes and the presence of `word/document.xml`.
/// This is a container-level probe only; it does not parse the document.
///
/// # Example
/// ```no_run
/// use redocx::detect::detect_docx_from_path;
///
/// detect_docx_from_path("article.docx").expect("not a Word document");
/// ```
pub fn detect_docx_from_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    detect_docx_from_bytes(&data)
}

/// Validate that a byte buffer holds a DOCX package.
///
/// # Returns
/// * `Ok(())` if the data is a ZIP archive containing `word/document.xml`
/// * `Err(Error::UnknownFormat)` for anything else
pub fn detect_docx_from_bytes(data: &[u8]) -> Result<()> {
    if data.len() < ZIP_MAGIC.len() || !data.starts_with(ZIP_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|_| Error::UnknownFormat)?;
    if archive.by_name(MAIN_PART).is_err() {
        return Err(Error::UnknownFormat);
    }

    Ok(())
}

/// Check if a file is a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_docx_from_path(path).is_ok()
}

/// Check if bytes represent a DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_docx_from_bytes(data).is_ok()
}

/// Check whether a file name looks like a convertible document.
///
/// Word drops `~$`-prefixed lock files next to open documents; batch drivers
/// must skip those even though the extension matches.
pub fn is_candidate_file_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".docx") && !name.starts_with("~$")
}
