//! End-to-end conversion tests: synthesize a source package, run the full
//! pipeline, and inspect the emitted package.

use std::io::{Cursor, Read, Write};

use redocx::{convert_bytes, convert_file, ConvertOptions, KnownAuthors};
use zip::write::SimpleFileOptions;

const WML_XMLNS: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#,
);

fn source_package(body: &str, rels: Option<&str>) -> Vec<u8> {
    let document = format!(
        r#"<w:document {}><w:body>{}</w:body></w:document>"#,
        WML_XMLNS, body
    );
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default();
    zip.start_file("word/document.xml", opts).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    if let Some(rels) = rels {
        zip.start_file("word/_rels/document.xml.rels", opts).unwrap();
        zip.write_all(rels.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn read_part(package: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(package.to_vec())).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

fn frame(text: &str) -> String {
    format!(
        concat!(
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>{}</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
        ),
        text
    )
}

#[test]
fn converts_title_and_body_through_builtin_template() {
    let body = format!(
        concat!(
            "{}",
            r#"<w:p><w:r><w:t>Why Meetings Fail</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>most meetings fail because nobody owns the outcome.</w:t></w:r></w:p>"#,
        ),
        frame("Why Meetings Fail")
    );
    let source = source_package(&body, None);

    let (output, report) = convert_bytes(&source, &ConvertOptions::new()).unwrap();

    assert_eq!(report.title, "Why Meetings Fail");
    // The frame won the title; the identical body paragraph was suppressed.
    assert_eq!(report.blocks, 1);

    let document = read_part(&output, "word/document.xml");
    assert!(document.contains(r#"<w:pStyle w:val="Heading1"/>"#));
    assert_eq!(document.matches("Why Meetings Fail").count(), 1);
    assert!(document.contains("nobody owns the outcome"));
    assert!(document.contains(r#"<w:pStyle w:val="BodyText"/>"#));
}

#[test]
fn empty_title_still_gets_heading_paragraph() {
    let body = r#"<w:p><w:r><w:t>body only, no frames anywhere</w:t></w:r></w:p>"#;
    let source = source_package(body, None);

    let (output, report) = convert_bytes(&source, &ConvertOptions::new()).unwrap();

    assert_eq!(report.title, "");
    let document = read_part(&output, "word/document.xml");
    assert!(document.contains(r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr></w:p>"#));
}

#[test]
fn hyperlink_survives_with_relationship_and_no_duplicate_text() {
    let body = concat!(
        r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Hello </w:t></w:r>"#,
        r#"<w:hyperlink r:id="rId5"><w:r><w:t>world</w:t></w:r></w:hyperlink>"#,
        // Word's sibling copy of the display text.
        r#"<w:r><w:t>world</w:t></w:r></w:p>"#,
    );
    let rels = concat!(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId5" "#,
        r#"Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" "#,
        r#"Target="https://example.com/" TargetMode="External"/>"#,
        r#"</Relationships>"#,
    );
    let source = source_package(body, Some(rels));

    let (output, _) = convert_bytes(&source, &ConvertOptions::new()).unwrap();

    let document = read_part(&output, "word/document.xml");
    let out_rels = read_part(&output, "word/_rels/document.xml.rels");

    assert_eq!(document.matches("world").count(), 1);
    assert!(document.contains("<w:hyperlink r:id="));
    assert!(document.contains(r#"<w:rPr><w:b/></w:rPr>"#));
    assert!(out_rels.contains(r#"Target="https://example.com/" TargetMode="External""#));
}

#[test]
fn ragged_table_is_padded_to_widest_row() {
    let cell = |text: &str| format!(r#"<w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>"#, text);
    let body = format!(
        "<w:tbl><w:tr>{}{}</w:tr><w:tr>{}{}{}</w:tr><w:tr>{}</w:tr></w:tbl>",
        cell("a"),
        cell("b"),
        cell("c"),
        cell("d"),
        cell("e"),
        cell("f"),
    );
    let source = source_package(&body, None);

    let (output, report) = convert_bytes(&source, &ConvertOptions::new()).unwrap();
    assert_eq!(report.tables, 1);

    let document = read_part(&output, "word/document.xml");
    assert_eq!(document.matches("<w:gridCol/>").count(), 3);
    // Rows of width 2 and 1 get one and two blank trailing cells.
    assert_eq!(document.matches("<w:tc><w:p/></w:tc>").count(), 3);
    assert_eq!(document.matches("<w:tcBorders>").count(), 6);
}

#[test]
fn author_is_only_detected_in_opening_paragraphs() {
    let authors = KnownAuthors::new(vec!["Jane Doe".to_string()]);
    let para = |text: &str| format!(r#"<w:p><w:r><w:t>{}</w:t></w:r></w:p>"#, text);

    let early = source_package(
        &format!("{}{}", para("a piece by jane doe"), para("more text")),
        None,
    );
    let late = source_package(
        &format!(
            "{}{}{}{}",
            para("one"),
            para("two"),
            para("three"),
            para("a piece by jane doe")
        ),
        None,
    );

    let options = ConvertOptions::new().with_authors(authors);
    let (_, early_report) = convert_bytes(&early, &options).unwrap();
    let (_, late_report) = convert_bytes(&late, &options).unwrap();

    assert_eq!(early_report.author.as_deref(), Some("Jane Doe"));
    assert_eq!(late_report.author, None);
}

#[test]
fn convert_file_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("draft.docx");
    let output = dir.path().join("clean.docx");

    let body = format!(
        concat!(
            "{}",
            r#"<w:p><w:r><w:t>The Five Pillars Of Leadership</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>leaders are made in the quiet moments between crises.</w:t></w:r></w:p>"#,
        ),
        frame("Decisions That Matter")
    );
    std::fs::write(&input, source_package(&body, None)).unwrap();

    let report = convert_file(&input, &output, &ConvertOptions::new()).unwrap();

    assert_eq!(report.title, "Decisions That Matter");
    assert_eq!(report.blocks, 2);
    assert_eq!(report.paragraphs, 1);

    let written = std::fs::read(&output).unwrap();
    let document = read_part(&written, "word/document.xml");
    // Title-Case paragraph was promoted to a section heading.
    assert!(document.contains(r#"<w:pStyle w:val="Heading2"/>"#));
    assert!(redocx::detect::detect_docx_from_bytes(&written).is_ok());
}

#[test]
fn list_items_keep_text_but_lose_links() {
    let body = concat!(
        r#"<w:p><w:pPr><w:numPr><w:numId w:val="2"/></w:numPr></w:pPr>"#,
        r#"<w:hyperlink r:id="rId5"><w:r><w:t>the handbook</w:t></w:r></w:hyperlink></w:p>"#,
    );
    let rels = concat!(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        r#"<Relationship Id="rId5" "#,
        r#"Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" "#,
        r#"Target="https://handbook.example/" TargetMode="External"/>"#,
        r#"</Relationships>"#,
    );
    let source = source_package(body, Some(rels));

    let (output, _) = convert_bytes(&source, &ConvertOptions::new()).unwrap();
    let document = read_part(&output, "word/document.xml");
    let out_rels = read_part(&output, "word/_rels/document.xml.rels");

    assert!(document.contains(r#"<w:pStyle w:val="ListParagraph"/>"#));
    assert!(document.contains("the handbook"));
    assert!(!document.contains("<w:hyperlink"));
    assert!(!out_rels.contains("handbook.example"));
}
