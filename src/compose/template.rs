//! Style template loading and validation.
//!
//! A template is an ordinary DOCX package that supplies named styles and
//! page setup. Its body content is discarded; only the `w:sectPr` survives
//! into the output. Style resolution happens up front so a bad template
//! fails the conversion before anything is written.

use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::ooxml::{wml_attr, REL_NS, WML_NS};

/// Package part holding the document body.
const DOCUMENT_PART: &str = "word/document.xml";

/// Package part holding the style definitions.
const STYLES_PART: &str = "word/styles.xml";

/// Package part holding the document-level relationship table.
pub(crate) const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// The paragraph styles the composer requires, by UI name.
const REQUIRED_PARAGRAPH_STYLES: [&str; 5] = [
    "Heading 1",
    "Heading 2",
    "Heading 3",
    "Body Text",
    "List Paragraph",
];

/// The character style applied to hyperlink runs.
const HYPERLINK_STYLE: &str = "Hyperlink";

/// Resolved style IDs for the required named styles.
#[derive(Debug, Clone)]
pub struct StyleIds {
    /// Title style ("Heading 1")
    pub heading1: String,
    /// Section heading style ("Heading 2")
    pub heading2: String,
    /// Sub-section heading style ("Heading 3")
    pub heading3: String,
    /// Plain paragraph style ("Body Text")
    pub body_text: String,
    /// List item style ("List Paragraph")
    pub list_paragraph: String,
    /// Hyperlink character style
    pub hyperlink: String,
}

/// A loaded and validated style template.
pub struct Template {
    /// All package parts in archive order: `(name, bytes)`.
    pub(crate) parts: Vec<(String, Vec<u8>)>,

    /// Document part split around the body: everything up to and including
    /// the `<w:body>` open tag, and the retained tail (`w:sectPr` onward).
    pub(crate) body_prefix: String,
    pub(crate) body_suffix: String,

    /// Relationship part text, when the template carries one.
    pub(crate) rels_xml: Option<String>,

    /// Resolved style IDs.
    pub(crate) styles: StyleIds,
}

impl Template {
    /// Open and validate a template file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref()).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.as_ref().display(), e),
            ))
        })?;
        Self::from_bytes(data)
    }

    /// Build a template from package bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data.into()))
            .map_err(|_| Error::InvalidPackage("template is not a ZIP archive".into()))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            parts.push((entry.name().to_string(), bytes));
        }

        Self::from_parts(parts)
    }

    /// The built-in fallback template: a minimal package defining exactly
    /// the required styles with default page setup.
    pub fn builtin() -> Self {
        let parts = vec![
            (
                "[Content_Types].xml".to_string(),
                builtin::CONTENT_TYPES.as_bytes().to_vec(),
            ),
            ("_rels/.rels".to_string(), builtin::ROOT_RELS.as_bytes().to_vec()),
            (
                DOCUMENT_PART.to_string(),
                builtin::DOCUMENT.as_bytes().to_vec(),
            ),
            (STYLES_PART.to_string(), builtin::STYLES.as_bytes().to_vec()),
            (
                DOCUMENT_RELS_PART.to_string(),
                builtin::DOCUMENT_RELS.as_bytes().to_vec(),
            ),
        ];
        // The built-in parts are static and well-formed.
        Self::from_parts(parts).expect("built-in template is valid")
    }

    fn from_parts(parts: Vec<(String, Vec<u8>)>) -> Result<Self> {
        let document_xml = part_text(&parts, DOCUMENT_PART)
            .ok_or_else(|| Error::MissingPart(DOCUMENT_PART.into()))?;
        let styles_xml = part_text(&parts, STYLES_PART)
            .ok_or_else(|| Error::MissingPart(STYLES_PART.into()))?;
        let rels_xml = part_text(&parts, DOCUMENT_RELS_PART);

        let styles = resolve_styles(&styles_xml)?;
        let (body_prefix, body_suffix) = split_body(&document_xml)?;

        Ok(Self {
            parts,
            body_prefix,
            body_suffix,
            rels_xml,
            styles,
        })
    }

    /// Resolved style IDs.
    pub fn styles(&self) -> &StyleIds {
        &self.styles
    }
}

fn part_text(parts: &[(String, Vec<u8>)], name: &str) -> Option<String> {
    parts
        .iter()
        .find(|(n, _)| n == name)
        .and_then(|(_, bytes)| String::from_utf8(bytes.clone()).ok())
}

/// Resolve the required style names to style IDs from `word/styles.xml`.
///
/// Styles are matched by UI name (`w:name`), the same lookup the original
/// template was authored against. A missing style aborts the conversion;
/// no fallback is substituted.
fn resolve_styles(styles_xml: &str) -> Result<StyleIds> {
    let xml =
        roxmltree::Document::parse(styles_xml).map_err(|e| Error::xml(STYLES_PART, e))?;

    let find = |name: &str, style_type: &str| -> Result<String> {
        xml.root_element()
            .children()
            .filter(|n| {
                n.tag_name().name() == "style" && n.tag_name().namespace() == Some(WML_NS)
            })
            .filter(|n| n.attribute((WML_NS, "type")) == Some(style_type))
            .find(|n| wml_attr(*n, "name") == Some(name))
            .and_then(|n| n.attribute((WML_NS, "styleId")))
            .map(String::from)
            .ok_or_else(|| Error::StyleNotFound(name.to_string()))
    };

    let [h1, h2, h3, body, list] = REQUIRED_PARAGRAPH_STYLES;
    Ok(StyleIds {
        heading1: find(h1, "paragraph")?,
        heading2: find(h2, "paragraph")?,
        heading3: find(h3, "paragraph")?,
        body_text: find(body, "paragraph")?,
        list_paragraph: find(list, "paragraph")?,
        hyperlink: find(HYPERLINK_STYLE, "character")?,
    })
}

/// Split the template's document part around its body content.
///
/// Returns the prefix (through the `<w:body>` open tag, keeping the root
/// element's namespace declarations) and the suffix (the body-level
/// `w:sectPr` if present, then the closing tags). Everything between is the
/// template's placeholder content and is dropped.
fn split_body(document_xml: &str) -> Result<(String, String)> {
    let open = document_xml
        .find("<w:body")
        .ok_or_else(|| Error::InvalidPackage("template has no w:body".into()))?;
    let open_end = document_xml[open..]
        .find('>')
        .map(|i| open + i + 1)
        .ok_or_else(|| Error::InvalidPackage("malformed w:body tag".into()))?;
    let close = document_xml
        .rfind("</w:body>")
        .ok_or_else(|| Error::InvalidPackage("template has no closing w:body".into()))?;

    let prefix = ensure_rel_ns(document_xml[..open_end].to_string());
    let inner = &document_xml[open_end..close];
    let tail = &document_xml[close..];

    // Keep only the body-level section properties (the last sectPr is the
    // body's own; earlier ones belong to section-break paragraphs).
    let sect = inner.rfind("<w:sectPr").map(|start| {
        let rest = &inner[start..];
        let end = rest
            .find("</w:sectPr>")
            .map(|i| i + "</w:sectPr>".len())
            .or_else(|| rest.find("/>").map(|i| i + 2))
            .unwrap_or(rest.len());
        &rest[..end]
    });

    let suffix = format!("{}{}", sect.unwrap_or(""), tail);
    Ok((prefix, suffix))
}

/// Hyperlink runs are emitted with `r:id` attributes; a template that never
/// used relationships itself may not declare the `r` namespace on its root
/// element. Inject it so the emitted document stays well formed.
fn ensure_rel_ns(prefix: String) -> String {
    if prefix.contains("xmlns:r=") {
        return prefix;
    }
    let Some(root) = prefix.find("<w:document") else {
        return prefix;
    };
    let Some(end) = prefix[root..].find('>') else {
        return prefix;
    };
    format!(
        r#"{} xmlns:r="{}"{}"#,
        &prefix[..root + end],
        REL_NS,
        &prefix[root + end..]
    )
}

/// Static parts for the built-in template.
mod builtin {
    pub(super) const CONTENT_TYPES: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
        r#"</Types>"#,
    );

    pub(super) const ROOT_RELS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
        r#"</Relationships>"#,
    );

    pub(super) const DOCUMENT: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        r#"<w:body><w:sectPr><w:pgSz w:w="12240" w:h="15840"/>"#,
        r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440"/>"#,
        r#"</w:sectPr></w:body></w:document>"#,
    );

    pub(super) const DOCUMENT_RELS: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        r#"</Relationships>"#,
    );

    pub(super) const STYLES: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="Heading 1"/>"#,
        r#"<w:pPr><w:spacing w:before="240" w:after="120"/></w:pPr>"#,
        r#"<w:rPr><w:b/><w:sz w:val="48"/></w:rPr></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="Heading 2"/>"#,
        r#"<w:pPr><w:spacing w:before="200" w:after="100"/></w:pPr>"#,
        r#"<w:rPr><w:b/><w:sz w:val="36"/></w:rPr></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="Heading 3"/>"#,
        r#"<w:pPr><w:spacing w:before="160" w:after="80"/></w:pPr>"#,
        r#"<w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="BodyText"><w:name w:val="Body Text"/>"#,
        r#"<w:pPr><w:spacing w:after="120"/></w:pPr></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/>"#,
        r#"<w:pPr><w:ind w:left="720"/></w:pPr></w:style>"#,
        r#"<w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/>"#,
        r#"<w:rPr><w:color w:val="0563C1"/><w:u w:val="single"/></w:rPr></w:style>"#,
        r#"</w:styles>"#,
    );
}
