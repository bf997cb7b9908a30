//! DOCX extraction: one source package in, one [`ParsedDocument`] out.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::path::Path;

use crate::classify::{self, KnownAuthors};
use crate::error::{Error, Result};
use crate::model::{ContentBlock, ParsedDocument, Run, TableCell, TableRow};
use crate::ooxml::{is_wml, read_zip_text, wml, wml_bool, REL_NS};
use crate::parser::frames::{frame_texts, header_texts, paragraph_text};

/// Package part holding the document body.
const DOCUMENT_PART: &str = "word/document.xml";

/// Package part holding the document-level relationship table.
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// Extractor for a single source document.
///
/// # Example
///
/// ```no_run
/// use redocx::{DocxParser, KnownAuthors};
///
/// let mut parser = DocxParser::open("article.docx")?;
/// let doc = parser.parse(&KnownAuthors::empty())?;
/// println!("title: {}", doc.title);
/// # Ok::<(), redocx::Error>(())
/// ```
pub struct DocxParser {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
}

impl DocxParser {
    /// Open a source document from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path.as_ref()).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.as_ref().display(), e),
            ))
        })?;
        Self::from_bytes(data)
    }

    /// Open a source document from bytes.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data.into()))
            .map_err(|_| Error::InvalidPackage("file is not a ZIP archive".into()))?;
        Ok(Self { archive })
    }

    /// Open a source document from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Extract the document into the intermediate representation.
    ///
    /// Frames, title, body blocks, and author are derived exactly once; the
    /// known-authors list is only read, never mutated.
    pub fn parse(&mut self, authors: &KnownAuthors) -> Result<ParsedDocument> {
        let document_xml = read_zip_text(&mut self.archive, DOCUMENT_PART).ok_or_else(|| {
            Error::InvalidPackage(format!("missing {} (is this a DOCX file?)", DOCUMENT_PART))
        })?;
        let document = roxmltree::Document::parse(&document_xml)
            .map_err(|e| Error::xml(DOCUMENT_PART, e))?;

        let rels = self.relationships();
        let header_parts = self.header_parts();

        // Title candidates: body frames first, then headers (frames plus
        // plain header paragraphs), in package order.
        let mut frames = frame_texts(document.root_element());
        for part in &header_parts {
            if let Some(xml) = read_zip_text(&mut self.archive, part) {
                match roxmltree::Document::parse(&xml) {
                    Ok(header) => frames.extend(header_texts(header.root_element())),
                    Err(e) => log::warn!("skipping unparseable header {}: {}", part, e),
                }
            }
        }

        let title = classify::choose_title(frames.iter().map(String::as_str));

        let body = wml(document.root_element(), "body")
            .ok_or_else(|| Error::InvalidPackage("missing w:body".into()))?;

        let mut blocks = Vec::new();
        for node in body.children() {
            if is_wml(node, "tbl") {
                blocks.push(extract_table(node));
            } else if is_wml(node, "p") {
                if let Some(block) = extract_paragraph(node, &frames, &rels, authors) {
                    blocks.push(block);
                }
            }
        }

        let author = classify::detect_author(
            blocks.iter().filter_map(|b| match b {
                ContentBlock::Paragraph { text, .. } => Some(text.as_str()),
                _ => None,
            }),
            authors,
        );

        log::debug!(
            "extracted {} blocks, title {:?}, author {:?}",
            blocks.len(),
            title,
            author
        );

        Ok(ParsedDocument {
            title,
            author,
            blocks,
        })
    }

    /// Relationship ID to target URL mapping for the document part.
    fn relationships(&mut self) -> HashMap<String, String> {
        let mut rels = HashMap::new();
        let Some(xml_content) = read_zip_text(&mut self.archive, DOCUMENT_RELS_PART) else {
            return rels;
        };
        let Ok(xml) = roxmltree::Document::parse(&xml_content) else {
            return rels;
        };
        for node in xml.root_element().children() {
            if node.tag_name().name() == "Relationship" {
                if let (Some(id), Some(target)) =
                    (node.attribute("Id"), node.attribute("Target"))
                {
                    rels.insert(id.to_string(), target.to_string());
                }
            }
        }
        rels
    }

    /// Names of all header parts in the package, sorted for a stable order.
    fn header_parts(&self) -> Vec<String> {
        let mut parts: Vec<String> = self
            .archive
            .file_names()
            .filter(|n| n.starts_with("word/header") && n.ends_with(".xml"))
            .map(String::from)
            .collect();
        parts.sort();
        parts
    }
}

/// Classify and extract one body paragraph, or `None` when it is skipped
/// (blank, or a main-flow duplicate of a text frame).
fn extract_paragraph(
    node: roxmltree::Node,
    frames: &[String],
    rels: &HashMap<String, String>,
    authors: &KnownAuthors,
) -> Option<ContentBlock> {
    let full_text = paragraph_text(node);
    let text = full_text.trim();
    if text.is_empty() {
        return None;
    }
    if frames.iter().any(|f| f == text) {
        // Text boxes often shadow the title/byline as real body paragraphs;
        // the frame copy already won, so the body copy is dropped.
        log::debug!("suppressing frame-duplicate paragraph: {:?}", text);
        return None;
    }

    let is_list = wml(node, "pPr")
        .and_then(|ppr| wml(ppr, "numPr"))
        .is_some();

    if is_list {
        return Some(ContentBlock::ListItem {
            text: text.to_string(),
            runs: paragraph_runs(node, rels),
        });
    }
    if classify::is_title_case_heading(text, authors) {
        return Some(ContentBlock::heading2(text));
    }
    Some(ContentBlock::Paragraph {
        text: text.to_string(),
        runs: paragraph_runs(node, rels),
    })
}

/// Walk a paragraph's runs in source order.
///
/// A `w:hyperlink` contributes one run per contained text node, with the
/// relationship-resolved target and no independent formatting. Word also
/// stores the display text as a sibling plain run, so any plain text node
/// whose exact text was already emitted under a hyperlink is skipped.
fn paragraph_runs(para: roxmltree::Node, rels: &HashMap<String, String>) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut seen_hyperlink_texts: HashSet<&str> = HashSet::new();

    for node in para.descendants() {
        if is_wml(node, "hyperlink") {
            let href = node
                .attribute((REL_NS, "id"))
                .and_then(|rid| rels.get(rid))
                .cloned();
            if href.is_none() {
                log::debug!("hyperlink with unresolved relationship; keeping text only");
            }
            for t in node.descendants().filter(|n| is_wml(*n, "t")) {
                if let Some(text) = t.text() {
                    if text.is_empty() {
                        continue;
                    }
                    runs.push(Run {
                        text: text.to_string(),
                        bold: None,
                        italic: None,
                        underline: None,
                        hyperlink: href.clone(),
                    });
                    seen_hyperlink_texts.insert(text);
                }
            }
        } else if is_wml(node, "t") {
            if node.ancestors().any(|a| is_wml(a, "hyperlink")) {
                continue; // already emitted by the hyperlink branch
            }
            let Some(text) = node.text() else { continue };
            if text.is_empty() || seen_hyperlink_texts.contains(text) {
                continue;
            }
            let run = node.ancestors().find(|a| is_wml(*a, "r"));
            let present = |name: &str| {
                run.is_some_and(|r| r.descendants().any(|n| is_wml(n, name)))
            };
            runs.push(Run::formatted(
                text,
                Some(present("b")),
                Some(present("i")),
                Some(present("u")),
            ));
        }
    }

    runs
}

/// Extract a body table.
///
/// Cell runs keep their tri-state formatting toggles but hyperlinks inside
/// tables are not resolved; link display text comes through as plain text.
fn extract_table(tbl: roxmltree::Node) -> ContentBlock {
    let mut rows = Vec::new();
    for tr in tbl.children().filter(|n| is_wml(*n, "tr")) {
        let mut cells = Vec::new();
        for tc in tr.children().filter(|n| is_wml(*n, "tc")) {
            let mut cell_runs = Vec::new();
            for p in tc.children().filter(|n| is_wml(*n, "p")) {
                for r in p.descendants().filter(|n| is_wml(*n, "r")) {
                    let text: String = r
                        .children()
                        .filter(|n| is_wml(*n, "t"))
                        .filter_map(|n| n.text())
                        .collect();
                    if text.is_empty() {
                        continue;
                    }
                    let rpr = wml(r, "rPr");
                    cell_runs.push(Run {
                        text,
                        bold: rpr.and_then(|p| wml_bool(p, "b")),
                        italic: rpr.and_then(|p| wml_bool(p, "i")),
                        underline: rpr.and_then(|p| wml_bool(p, "u")),
                        hyperlink: None,
                    });
                }
            }
            cells.push(TableCell::new(cell_runs));
        }
        rows.push(TableRow::new(cells));
    }
    ContentBlock::Table { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn package(document_xml: &str, rels_xml: Option<&str>) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        zip.start_file(DOCUMENT_PART, opts).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        if let Some(rels) = rels_xml {
            zip.start_file(DOCUMENT_RELS_PART, opts).unwrap();
            zip.write_all(rels.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn document(body: &str) -> String {
        format!(
            concat!(
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<w:body>{}</w:body></w:document>"#,
            ),
            body
        )
    }

    fn parse_body(body: &str) -> ParsedDocument {
        let data = package(&document(body), None);
        DocxParser::from_bytes(data)
            .unwrap()
            .parse(&KnownAuthors::empty())
            .unwrap()
    }

    #[test]
    fn test_not_a_zip() {
        let result = DocxParser::from_bytes(b"plain text".to_vec());
        assert!(matches!(result, Err(Error::InvalidPackage(_))));
    }

    #[test]
    fn test_missing_document_part() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        let data = zip.finish().unwrap().into_inner();

        let result = DocxParser::from_bytes(data)
            .unwrap()
            .parse(&KnownAuthors::empty());
        assert!(matches!(result, Err(Error::InvalidPackage(_))));
    }

    #[test]
    fn test_empty_paragraphs_skipped() {
        let doc = parse_body(r#"<w:p/><w:p><w:r><w:t>  </w:t></w:r></w:p>"#);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_paragraph_classification() {
        let doc = parse_body(concat!(
            r#"<w:p><w:r><w:t>The Five Pillars Of Leadership</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>the five pillars of leadership are important today</w:t></w:r></w:p>"#,
            r#"<w:p><w:pPr><w:numPr><w:numId w:val="1"/></w:numPr></w:pPr>"#,
            r#"<w:r><w:t>First item</w:t></w:r></w:p>"#,
        ));

        assert_eq!(doc.block_count(), 3);
        assert!(matches!(
            &doc.blocks[0],
            ContentBlock::Heading { level: HeadingLevel::H2, text } if text == "The Five Pillars Of Leadership"
        ));
        assert!(doc.blocks[1].is_paragraph());
        assert!(matches!(&doc.blocks[2], ContentBlock::ListItem { .. }));
    }

    #[test]
    fn test_run_formatting_toggles() {
        let doc = parse_body(concat!(
            r#"<w:p><w:r><w:rPr><w:b/><w:i/></w:rPr><w:t>styled words here</w:t></w:r>"#,
            r#"<w:r><w:t> and plain tail</w:t></w:r></w:p>"#,
        ));

        let ContentBlock::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].bold, Some(true));
        assert_eq!(runs[0].italic, Some(true));
        assert_eq!(runs[0].underline, Some(false));
        assert_eq!(runs[1].bold, Some(false));
    }

    #[test]
    fn test_hyperlink_resolution_and_dedup() {
        let body = concat!(
            r#"<w:p><w:r><w:t>visit the docs at </w:t></w:r>"#,
            r#"<w:hyperlink r:id="rId7"><w:r><w:t>example</w:t></w:r></w:hyperlink>"#,
            // Word keeps a sibling copy of the display text; it must not
            // double-count.
            r#"<w:r><w:t>example</w:t></w:r></w:p>"#,
        );
        let rels = concat!(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId7" Target="https://example.com/" TargetMode="External" "#,
            r#"Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink"/>"#,
            r#"</Relationships>"#,
        );
        let data = package(&document(body), Some(rels));
        let doc = DocxParser::from_bytes(data)
            .unwrap()
            .parse(&KnownAuthors::empty())
            .unwrap();

        let ContentBlock::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].text, "example");
        assert_eq!(runs[1].hyperlink.as_deref(), Some("https://example.com/"));
        assert_eq!(runs[1].bold, None);
    }

    #[test]
    fn test_hyperlink_missing_relationship() {
        let body = concat!(
            r#"<w:p><w:hyperlink r:id="rId99"><w:r><w:t>dangling</w:t></w:r></w:hyperlink></w:p>"#,
        );
        let doc = parse_body(body);

        let ContentBlock::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(runs[0].text, "dangling");
        assert_eq!(runs[0].hyperlink, None);
    }

    #[test]
    fn test_title_from_frame_and_body_suppression() {
        let body = concat!(
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>An Article By Jane Doe</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>Decisions That Matter</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
            // Body duplicate of the title frame: suppressed.
            r#"<w:p><w:r><w:t>Decisions That Matter</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>body text stays here</w:t></w:r></w:p>"#,
        );
        let doc = parse_body(body);

        assert_eq!(doc.title, "Decisions That Matter");
        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.blocks[0].plain_text(), "body text stays here");
    }

    #[test]
    fn test_split_run_frame_title_and_suppression() {
        // Word splits "Leadership" across two runs; the joined frame text
        // must not gain a space, and the matching body paragraph must still
        // be recognized as the frame's duplicate.
        let body = concat!(
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>Lead</w:t></w:r><w:r><w:t>ership</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Lead</w:t></w:r><w:r><w:t>ership</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>body text stays here</w:t></w:r></w:p>"#,
        );
        let doc = parse_body(body);

        assert_eq!(doc.title, "Leadership");
        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.blocks[0].plain_text(), "body text stays here");
    }

    #[test]
    fn test_title_from_plain_header_paragraph() {
        let document_xml = document(r#"<w:p><w:r><w:t>body text only</w:t></w:r></w:p>"#);
        let header_xml = concat!(
            r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:p><w:r><w:t>Why Meetings Fail</w:t></w:r></w:p>"#,
            r#"</w:hdr>"#,
        );

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        zip.start_file(DOCUMENT_PART, opts).unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.start_file("word/header1.xml", opts).unwrap();
        zip.write_all(header_xml.as_bytes()).unwrap();
        let data = zip.finish().unwrap().into_inner();

        let doc = DocxParser::from_bytes(data)
            .unwrap()
            .parse(&KnownAuthors::empty())
            .unwrap();

        assert_eq!(doc.title, "Why Meetings Fail");
        assert_eq!(doc.block_count(), 1);
    }

    #[test]
    fn test_no_frames_empty_title() {
        let doc = parse_body(r#"<w:p><w:r><w:t>just some body text</w:t></w:r></w:p>"#);
        assert_eq!(doc.title, "");
    }

    #[test]
    fn test_table_extraction_tristate() {
        let body = concat!(
            r#"<w:tbl><w:tr>"#,
            r#"<w:tc><w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Name</w:t></w:r></w:p></w:tc>"#,
            r#"<w:tc><w:p><w:r><w:t>Value</w:t></w:r></w:p></w:tc>"#,
            r#"</w:tr><w:tr>"#,
            r#"<w:tc><w:p><w:r><w:t>rows</w:t></w:r></w:p></w:tc>"#,
            r#"</w:tr></w:tbl>"#,
        );
        let doc = parse_body(body);

        let ContentBlock::Table { rows } = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].width(), 2);
        assert_eq!(rows[1].width(), 1);
        assert_eq!(rows[0].cells[0].runs[0].bold, Some(true));
        // Unspecified toggles stay unspecified in table cells.
        assert_eq!(rows[0].cells[1].runs[0].bold, None);
    }

    #[test]
    fn test_author_detected_in_opening_paragraphs() {
        let authors = KnownAuthors::new(vec!["Jane Doe".to_string()]);
        let body = concat!(
            r#"<w:p><w:r><w:t>a thoughtful piece by jane doe on decisions</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>more body text follows</w:t></w:r></w:p>"#,
        );
        let data = package(&document(body), None);
        let doc = DocxParser::from_bytes(data)
            .unwrap()
            .parse(&authors)
            .unwrap();

        assert_eq!(doc.author.as_deref(), Some("Jane Doe"));
    }
}
