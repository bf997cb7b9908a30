//! Floating text frame collection.
//!
//! Titles and bylines in the source documents live in text boxes anchored
//! outside the body flow (`w:txbxContent`), both in the document part and in
//! header parts. Headers additionally contribute their plain paragraphs:
//! some documents put the title directly in the header text block. Each
//! collected text is a title candidate.

use crate::classify::normalize_whitespace;
use crate::ooxml::{is_wml, WML_NS};

/// Collect the text of every floating text frame under `root`, in document
/// order. Empty frames are dropped; each frame's text is whitespace
/// normalized.
pub(crate) fn frame_texts(root: roxmltree::Node) -> Vec<String> {
    let mut frames = Vec::new();
    for node in root.descendants() {
        if !is_wml(node, "txbxContent") {
            continue;
        }
        let text = frame_text(node);
        if !text.is_empty() {
            frames.push(text);
        }
    }
    frames
}

/// Title candidates from a header part, in document order: floating frames
/// plus plain header paragraphs.
pub(crate) fn header_texts(root: roxmltree::Node) -> Vec<String> {
    let mut texts = Vec::new();
    for node in root.descendants() {
        if is_wml(node, "txbxContent") {
            let text = frame_text(node);
            if !text.is_empty() {
                texts.push(text);
            }
        } else if is_wml(node, "p")
            && !node.ancestors().any(|a| is_wml(a, "txbxContent"))
            && !node.descendants().any(|d| is_wml(d, "txbxContent"))
        {
            let text = normalize_whitespace(&paragraph_text(node));
            if !text.is_empty() {
                texts.push(text);
            }
        }
    }
    texts
}

/// Joined text of one frame. Runs within a paragraph concatenate with no
/// separator (Word splits words mid-run); only paragraph boundaries become
/// spaces.
fn frame_text(frame: roxmltree::Node) -> String {
    let joined = frame
        .descendants()
        .filter(|n| is_wml(*n, "p"))
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join(" ");
    normalize_whitespace(&joined)
}

/// Paragraph text of a node, from all `w:t` descendants in order.
pub(crate) fn paragraph_text(node: roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.tag_name().name() == "t" && n.tag_name().namespace() == Some(WML_NS))
        .filter_map(|n| n.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> String {
        format!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    #[test]
    fn test_frame_texts_in_order() {
        let xml = doc(concat!(
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>An  Article By</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>The Title</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
        ));
        let parsed = roxmltree::Document::parse(&xml).unwrap();
        let frames = frame_texts(parsed.root_element());
        assert_eq!(frames, vec!["An Article By Jane Doe", "The Title"]);
    }

    #[test]
    fn test_frame_runs_concatenate_without_separator() {
        // Word splits words across runs (revision tracking, spell check);
        // run boundaries must not introduce spaces.
        let xml = doc(concat!(
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>Lead</w:t></w:r><w:r><w:t>ership</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>In </w:t></w:r><w:r><w:t>Practice</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
        ));
        let parsed = roxmltree::Document::parse(&xml).unwrap();
        let frames = frame_texts(parsed.root_element());
        assert_eq!(frames, vec!["Leadership In Practice"]);
    }

    #[test]
    fn test_empty_frames_dropped() {
        let xml = doc(
            r#"<w:p><w:r><w:pict><w:txbxContent><w:p/></w:txbxContent></w:pict></w:r></w:p>"#,
        );
        let parsed = roxmltree::Document::parse(&xml).unwrap();
        assert!(frame_texts(parsed.root_element()).is_empty());
    }

    #[test]
    fn test_header_plain_paragraphs_are_candidates() {
        let xml = concat!(
            r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:p><w:r><w:t>Why Meetings Fail</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>An Article By Jane Doe</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
            r#"</w:hdr>"#,
        );
        let parsed = roxmltree::Document::parse(xml).unwrap();
        let texts = header_texts(parsed.root_element());
        assert_eq!(texts, vec!["Why Meetings Fail", "An Article By Jane Doe"]);
    }

    #[test]
    fn test_header_frame_paragraphs_not_double_counted() {
        let xml = concat!(
            r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
            r#"<w:p><w:r><w:pict><w:txbxContent>"#,
            r#"<w:p><w:r><w:t>The Title</w:t></w:r></w:p>"#,
            r#"</w:txbxContent></w:pict></w:r></w:p>"#,
            r#"</w:hdr>"#,
        );
        let parsed = roxmltree::Document::parse(xml).unwrap();
        let texts = header_texts(parsed.root_element());
        assert_eq!(texts, vec!["The Title"]);
    }

    #[test]
    fn test_paragraph_text_concatenates_runs() {
        let xml = doc(r#"<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>"#);
        let parsed = roxmltree::Document::parse(&xml).unwrap();
        let p = parsed
            .descendants()
            .find(|n| is_wml(*n, "p"))
            .unwrap();
        assert_eq!(paragraph_text(p), "Hello world");
    }
}
