//! Shared WordprocessingML helpers.
//!
//! Small namespace-aware accessors used by both the extractor and the
//! template loader.

use std::io::{Read, Seek};

/// Main WordprocessingML namespace.
pub(crate) const WML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Officedocument relationships namespace (attribute `r:id`).
pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Relationship type URI for external hyperlinks.
pub(crate) const HYPERLINK_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// Check if a node is a WML element with the given local name.
pub(crate) fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

/// First WML child with the given local name.
pub(crate) fn wml<'a>(
    node: roxmltree::Node<'a, 'a>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

/// `w:val` attribute of the first WML child with the given local name.
pub(crate) fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

/// Parse a WML boolean toggle element (e.g., w:b, w:i, w:u).
///
/// Present with no val, or val other than "0"/"false"/"none", means true.
pub(crate) fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .map_or(true, |v| v != "0" && v != "false" && v != "none")
    })
}

/// Read a package part as UTF-8 text, or `None` if the part is absent or
/// unreadable.
pub(crate) fn read_zip_text<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
    name: &str,
) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}
