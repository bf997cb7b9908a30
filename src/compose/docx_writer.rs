//! DOCX re-emission: one [`ParsedDocument`] plus a [`Template`] in, one
//! normalized package out.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

use crate::compose::template::{StyleIds, Template, DOCUMENT_RELS_PART};
use crate::compose::xml::{escape_attr, escape_text};
use crate::error::{Error, Result};
use crate::model::{ContentBlock, HeadingLevel, ParsedDocument, Run, TableRow};
use crate::ooxml::HYPERLINK_REL_TYPE;

/// Package part holding the document body.
const DOCUMENT_PART: &str = "word/document.xml";

/// Border color applied to every populated table cell.
const CELL_BORDER_COLOR: &str = "A4A4A4";

/// Interior cell margin on all four sides, in twentieths of a point.
const CELL_MARGIN_DXA: u32 = 100;

/// Composer for the normalized output document.
///
/// # Example
///
/// ```no_run
/// use redocx::{DocxWriter, ParsedDocument, Template};
///
/// let writer = DocxWriter::new(Template::builtin());
/// writer.write(&ParsedDocument::new(), "out.docx")?;
/// # Ok::<(), redocx::Error>(())
/// ```
pub struct DocxWriter {
    template: Template,
}

impl DocxWriter {
    /// Create a writer over a validated template.
    pub fn new(template: Template) -> Self {
        Self { template }
    }

    /// Compose and save the document, overwriting any existing file.
    ///
    /// A failed save propagates as-is; no partial-file cleanup is attempted.
    pub fn write<P: AsRef<Path>>(&self, doc: &ParsedDocument, out_path: P) -> Result<()> {
        let bytes = self.to_bytes(doc)?;
        std::fs::write(out_path.as_ref(), bytes).map_err(|e| {
            Error::Save(format!("{}: {}", out_path.as_ref().display(), e))
        })?;
        log::debug!("wrote {}", out_path.as_ref().display());
        Ok(())
    }

    /// Compose the output package in memory.
    pub fn to_bytes(&self, doc: &ParsedDocument) -> Result<Vec<u8>> {
        let mut emitter = BodyEmitter::new(self.template.styles().clone(), self.rel_id_floor());
        emitter.title(&doc.title);
        for block in &doc.blocks {
            emitter.block(block);
        }

        let document_xml = format!(
            "{}{}{}",
            self.template.body_prefix, emitter.body, self.template.body_suffix
        );
        let rels_xml = merge_relationships(self.template.rels_xml.as_deref(), &emitter.rels);

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();

        for (name, bytes) in &self.template.parts {
            if name == DOCUMENT_PART || name == DOCUMENT_RELS_PART {
                continue;
            }
            zip.start_file(name.as_str(), opts)?;
            zip.write_all(bytes)?;
        }
        zip.start_file(DOCUMENT_PART, opts)?;
        zip.write_all(document_xml.as_bytes())?;
        zip.start_file(DOCUMENT_RELS_PART, opts)?;
        zip.write_all(rels_xml.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// First relationship ID number safely past everything the template
    /// already uses.
    fn rel_id_floor(&self) -> u32 {
        max_rel_id(self.template.rels_xml.as_deref().unwrap_or("")) + 1
    }
}

/// Highest `rId<N>` number present in a relationships part.
fn max_rel_id(rels_xml: &str) -> u32 {
    let mut max = 0;
    for chunk in rels_xml.split("Id=\"rId").skip(1) {
        let digits: String = chunk.chars().take_while(char::is_ascii_digit).collect();
        if let Ok(n) = digits.parse::<u32>() {
            max = max.max(n);
        }
    }
    max
}

/// Splice new hyperlink relationships into the template's relationships
/// part (or a fresh one when the template has none).
fn merge_relationships(existing: Option<&str>, new_rels: &[(String, String)]) -> String {
    const EMPTY: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"</Relationships>"#,
    );
    let base = existing.unwrap_or(EMPTY);

    let mut additions = String::new();
    for (id, target) in new_rels {
        additions.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}" TargetMode="External"/>"#,
            id,
            HYPERLINK_REL_TYPE,
            escape_attr(target)
        ));
    }

    match base.rfind("</Relationships>") {
        Some(pos) => format!("{}{}{}", &base[..pos], additions, &base[pos..]),
        None => format!("{}{}", base, additions),
    }
}

/// Accumulates body XML and the hyperlink relationships it references.
struct BodyEmitter {
    styles: StyleIds,
    body: String,
    rels: Vec<(String, String)>,
    next_rel_id: u32,
}

impl BodyEmitter {
    fn new(styles: StyleIds, next_rel_id: u32) -> Self {
        Self {
            styles,
            body: String::new(),
            rels: Vec::new(),
            next_rel_id,
        }
    }

    /// The title paragraph is always emitted, even when the title is empty:
    /// the house style expects a Heading 1 slot at the top.
    fn title(&mut self, title: &str) {
        let style = self.styles.heading1.clone();
        self.literal_paragraph(&style, title);
    }

    fn block(&mut self, block: &ContentBlock) {
        match block {
            ContentBlock::Heading { text, level } => {
                let style = match level {
                    HeadingLevel::H2 => self.styles.heading2.clone(),
                    HeadingLevel::H3 => self.styles.heading3.clone(),
                };
                self.literal_paragraph(&style, text);
            }
            ContentBlock::Paragraph { runs, .. } => {
                let style = self.styles.body_text.clone();
                self.runs_paragraph(&style, runs, true);
            }
            ContentBlock::ListItem { runs, .. } => {
                // Hyperlinks inside list items degrade to plain text.
                let style = self.styles.list_paragraph.clone();
                self.runs_paragraph(&style, runs, false);
            }
            ContentBlock::Table { rows } => self.table(rows),
        }
    }

    /// A styled paragraph with literal text and no run formatting.
    fn literal_paragraph(&mut self, style_id: &str, text: &str) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
            escape_attr(style_id)
        ));
        if !text.is_empty() {
            self.body.push_str(&plain_run(text, None, None, None));
        }
        self.body.push_str("</w:p>");
    }

    /// A styled paragraph whose runs carry their own formatting. When
    /// `links` is false, hyperlink runs are flattened to plain text.
    fn runs_paragraph(&mut self, style_id: &str, runs: &[Run], links: bool) {
        self.body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
            escape_attr(style_id)
        ));
        for run in runs {
            match &run.hyperlink {
                Some(url) if links => {
                    let xml = self.hyperlink_run(&run.text, url);
                    self.body.push_str(&xml);
                }
                Some(url) => {
                    log::debug!("dropping hyperlink to {} (unsupported position)", url);
                    self.body
                        .push_str(&plain_run(&run.text, run.bold, run.italic, run.underline));
                }
                None => {
                    self.body
                        .push_str(&plain_run(&run.text, run.bold, run.italic, run.underline));
                }
            }
        }
        self.body.push_str("</w:p>");
    }

    /// A clickable hyperlink run, styled by the template's character style.
    fn hyperlink_run(&mut self, text: &str, url: &str) -> String {
        let rel_id = format!("rId{}", self.next_rel_id);
        self.next_rel_id += 1;
        self.rels.push((rel_id.clone(), url.to_string()));

        format!(
            concat!(
                r#"<w:hyperlink r:id="{}">"#,
                r#"<w:r><w:rPr><w:rStyle w:val="{}"/></w:rPr>"#,
                r#"<w:t xml:space="preserve">{}</w:t></w:r>"#,
                r#"</w:hyperlink>"#,
            ),
            rel_id,
            escape_attr(&self.styles.hyperlink),
            escape_text(text)
        )
    }

    /// A table sized rows x max-width. Populated cells get borders and
    /// margins; ragged rows leave default trailing cells. One empty
    /// paragraph follows as spacing.
    fn table(&mut self, rows: &[TableRow]) {
        let num_cols = rows.iter().map(TableRow::width).max().unwrap_or(0);
        if num_cols == 0 {
            log::debug!("skipping table with no cells");
            return;
        }

        self.body
            .push_str(r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/></w:tblPr><w:tblGrid>"#);
        for _ in 0..num_cols {
            self.body.push_str("<w:gridCol/>");
        }
        self.body.push_str("</w:tblGrid>");

        for row in rows {
            self.body.push_str("<w:tr>");
            for cell in &row.cells {
                self.body.push_str("<w:tc>");
                self.body.push_str(cell_properties().as_str());
                self.body.push_str("<w:p>");
                for run in &cell.runs {
                    self.body
                        .push_str(&plain_run(&run.text, run.bold, run.italic, run.underline));
                }
                self.body.push_str("</w:p></w:tc>");
            }
            for _ in row.width()..num_cols {
                self.body.push_str("<w:tc><w:p/></w:tc>");
            }
            self.body.push_str("</w:tr>");
        }
        self.body.push_str("</w:tbl><w:p/>");
    }
}

/// Border and margin properties for a populated table cell.
fn cell_properties() -> String {
    let border = |side: &str| {
        format!(
            r#"<w:{} w:val="single" w:sz="4" w:space="0" w:color="{}"/>"#,
            side, CELL_BORDER_COLOR
        )
    };
    let margin = |side: &str| {
        format!(
            r#"<w:{} w:w="{}" w:type="dxa"/>"#,
            side, CELL_MARGIN_DXA
        )
    };
    format!(
        "<w:tcPr><w:tcBorders>{}{}{}{}</w:tcBorders><w:tcMar>{}{}{}{}</w:tcMar></w:tcPr>",
        border("top"),
        border("left"),
        border("bottom"),
        border("right"),
        margin("top"),
        margin("start"),
        margin("bottom"),
        margin("end"),
    )
}

/// A plain run. Formatting toggles apply only when explicitly true;
/// `None` emits nothing, same as `Some(false)`.
fn plain_run(
    text: &str,
    bold: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
) -> String {
    let mut rpr = String::new();
    if bold == Some(true) {
        rpr.push_str("<w:b/>");
    }
    if italic == Some(true) {
        rpr.push_str("<w:i/>");
    }
    if underline == Some(true) {
        rpr.push_str(r#"<w:u w:val="single"/>"#);
    }

    let rpr = if rpr.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{}</w:rPr>", rpr)
    };
    format!(
        r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
        rpr,
        escape_text(text)
    )
}
