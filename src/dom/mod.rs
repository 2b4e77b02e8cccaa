//! Parsed markup trees.
//!
//! The extractor only needs a small view of a document: what kind each node
//! is, its tag and attributes, and its children in document order. That view
//! is the [`MarkupTree`] trait. [`ArenaDom`], filled by html5ever, is the
//! implementation used for EPUB spine documents; any other parser can be
//! plugged in by implementing the trait.

mod arena;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// What a node is, as far as text extraction is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Document,
    /// An element with its (lowercase) local tag name.
    Element(&'a str),
    /// A text node with its raw content.
    Text(&'a str),
    /// Comments, doctypes, processing instructions.
    Other,
}

/// Read-only traversal interface over a parsed document.
pub trait MarkupTree {
    type Node: Copy;

    fn root(&self) -> Self::Node;

    fn kind(&self, node: Self::Node) -> NodeKind<'_>;

    /// Attributes as `(local name, value)` pairs, in source order.
    fn attributes(&self, node: Self::Node) -> impl Iterator<Item = (&str, &str)> + '_;

    /// Children in document order.
    fn children(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    fn attr(&self, node: Self::Node, name: &str) -> Option<&str> {
        self.attributes(node)
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

impl MarkupTree for ArenaDom {
    type Node = ArenaNodeId;

    fn root(&self) -> ArenaNodeId {
        self.document()
    }

    fn kind(&self, node: ArenaNodeId) -> NodeKind<'_> {
        match self.get(node).map(|n| &n.data) {
            Some(ArenaNodeData::Document) => NodeKind::Document,
            Some(ArenaNodeData::Element { name, .. }) => NodeKind::Element(name.local.as_ref()),
            Some(ArenaNodeData::Text(text)) => NodeKind::Text(text),
            Some(ArenaNodeData::Other) | None => NodeKind::Other,
        }
    }

    fn attributes(&self, node: ArenaNodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        let attrs: &[Attribute] = match self.get(node).map(|n| &n.data) {
            Some(ArenaNodeData::Element { attrs, .. }) => attrs.as_slice(),
            _ => &[],
        };
        attrs
            .iter()
            .map(|a| (a.name.local.as_ref(), a.value.as_str()))
    }

    fn children(&self, node: ArenaNodeId) -> impl Iterator<Item = ArenaNodeId> + '_ {
        ArenaDom::children(self, node)
    }
}

/// Parse an HTML/XHTML document into an arena DOM.
pub fn parse_html(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse raw document bytes, honouring the encoding declared in the XML
/// prolog when the bytes are not valid UTF-8.
pub fn parse_html_bytes(bytes: &[u8]) -> ArenaDom {
    let hint = crate::util::extract_xml_encoding(bytes);
    let html = crate::util::decode_text(bytes, hint);
    parse_html(&html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_tree_view() {
        let dom = parse_html(r#"<body class="p-text"><p id="a">本文</p></body>"#);

        let body = dom.find_by_tag("body").unwrap();
        assert_eq!(dom.kind(body), NodeKind::Element("body"));
        assert_eq!(dom.attr(body, "class"), Some("p-text"));
        assert_eq!(dom.attr(body, "id"), None);

        let p = MarkupTree::children(&dom, body).next().unwrap();
        assert_eq!(dom.kind(p), NodeKind::Element("p"));
        let text = MarkupTree::children(&dom, p).next().unwrap();
        assert_eq!(dom.kind(text), NodeKind::Text("本文"));
        assert_eq!(dom.kind(dom.root()), NodeKind::Document);
    }

    #[test]
    fn test_svg_image_href_uses_local_name() {
        let dom = parse_html(
            r#"<body><svg xmlns:xlink="http://www.w3.org/1999/xlink"><image xlink:href="../image/cover.jpg"/></svg></body>"#,
        );
        let image = dom.find_by_tag("image").unwrap();
        assert_eq!(dom.attr(image, "href"), Some("../image/cover.jpg"));
    }

    #[test]
    fn test_parse_bytes_with_declared_encoding() {
        let mut bytes = br#"<?xml version="1.0" encoding="Shift_JIS"?><html><body><p>"#.to_vec();
        bytes.extend_from_slice(&[0x93, 0xFA, 0x96, 0x7B]);
        bytes.extend_from_slice(b"</p></body></html>");

        let dom = parse_html_bytes(&bytes);
        let p = dom.find_by_tag("p").unwrap();
        let text = dom.children(p).next().unwrap();
        assert_eq!(dom.text_content(text), Some("日本"));
    }
}
