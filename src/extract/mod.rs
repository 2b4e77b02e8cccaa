//! Text extraction from a parsed spine document.
//!
//! The walk is pure: it reads the tree and produces an ordered list of
//! [`Block`]s (paragraph text and image references) without touching the
//! book under construction. Committing those blocks into chapters is the
//! assembler's job.
//!
//! Rules, per node:
//! - `head` contributes nothing.
//! - A `body` whose class list hits the exclusion list contributes nothing.
//! - `img`/`image` with a `src`/`href` becomes a [`Block::Image`].
//! - `ruby` yields its direct text children only, dropping the `rt` gloss.
//! - Text nodes yield their trimmed content.
//! - Paragraph elements collect their children's text into a
//!   [`Block::Paragraph`] and yield nothing upward; other elements pass the
//!   concatenated text up to their parent.

use tracing::{debug, warn};

use crate::dom::{MarkupTree, NodeKind};
use crate::images::normalize_image_ref;
use crate::segment::SentenceRules;

/// Knobs for extraction and segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// A `body` with any of these classes is skipped entirely.
    pub excluded_body_classes: Vec<String>,
    /// Elements whose text is committed as a paragraph.
    pub paragraph_tags: Vec<String>,
    pub sentence_rules: SentenceRules,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            excluded_body_classes: vec!["p-caution".to_string(), "p-colophon".to_string()],
            paragraph_tags: vec!["p".to_string()],
            sentence_rules: SentenceRules::default(),
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_excluded_body_class(mut self, class: impl Into<String>) -> Self {
        self.excluded_body_classes.push(class.into());
        self
    }

    pub fn with_paragraph_tag(mut self, tag: impl Into<String>) -> Self {
        self.paragraph_tags.push(tag.into());
        self
    }

    pub fn with_sentence_rules(mut self, rules: SentenceRules) -> Self {
        self.sentence_rules = rules;
        self
    }

    fn is_paragraph(&self, tag: &str) -> bool {
        self.paragraph_tags
            .iter()
            .any(|p| p.eq_ignore_ascii_case(tag))
    }

    fn is_excluded_class(&self, class_attr: &str) -> bool {
        class_attr
            .split_ascii_whitespace()
            .any(|class| self.excluded_body_classes.iter().any(|c| c == class))
    }
}

/// One unit of extracted content, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Flattened text of a paragraph element (furigana already dropped).
    Paragraph(String),
    /// Raw `src`/`href` of an image node.
    Image(String),
}

/// Extract the blocks of a whole document.
pub fn extract_document<T: MarkupTree>(tree: &T, options: &ExtractOptions) -> Vec<Block> {
    let mut blocks = Vec::new();
    // Text outside any paragraph has nowhere to go and is dropped.
    let _ = walk(tree, tree.root(), options, &mut blocks);
    blocks
}

/// Extract the text span produced by `node`, along with any blocks it
/// commits on the way.
///
/// The returned text is what an ancestor would see: empty for paragraphs,
/// images and excluded subtrees.
pub fn extract_node<T: MarkupTree>(
    tree: &T,
    node: T::Node,
    options: &ExtractOptions,
) -> (String, Vec<Block>) {
    let mut blocks = Vec::new();
    let text = walk(tree, node, options, &mut blocks);
    (text, blocks)
}

fn walk<T: MarkupTree>(
    tree: &T,
    node: T::Node,
    options: &ExtractOptions,
    blocks: &mut Vec<Block>,
) -> String {
    let tag = match tree.kind(node) {
        NodeKind::Text(text) => return text.trim().to_string(),
        NodeKind::Other => return String::new(),
        NodeKind::Document => None,
        NodeKind::Element(tag) => Some(tag),
    };

    if let Some(tag) = tag {
        if tag.eq_ignore_ascii_case("head") {
            return String::new();
        }

        if tag.eq_ignore_ascii_case("body")
            && let Some(class) = tree.attr(node, "class")
            && options.is_excluded_class(class)
        {
            debug!(class, "skipping excluded body");
            return String::new();
        }

        if is_image_tag(tag)
            && let Some(href) = image_href(tree, node)
        {
            blocks.push(Block::Image(href.to_string()));
            return String::new();
        }

        if tag.eq_ignore_ascii_case("ruby") {
            return ruby_base_text(tree, node);
        }
    }

    let mut text = String::new();
    for child in tree.children(node) {
        text.push_str(&walk(tree, child, options, blocks));
    }

    match tag {
        Some(tag) if options.is_paragraph(tag) => {
            if !text.trim().is_empty() {
                blocks.push(Block::Paragraph(text));
            }
            String::new()
        }
        _ => text,
    }
}

fn is_image_tag(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("img") || tag.eq_ignore_ascii_case("image")
}

/// The first `src` or `href` attribute, if it names a file.
fn image_href<T: MarkupTree>(tree: &T, node: T::Node) -> Option<&str> {
    let (_, href) = tree
        .attributes(node)
        .find(|(key, _)| *key == "src" || *key == "href")?;
    if normalize_image_ref(href).is_none() {
        warn!(href, "image reference has no file name");
        return None;
    }
    Some(href)
}

/// Concatenate the direct text children of a ruby element.
///
/// Base text is kept as-is; `rt` glosses and any other element children
/// are ignored.
fn ruby_base_text<T: MarkupTree>(tree: &T, node: T::Node) -> String {
    tree.children(node)
        .filter_map(|child| match tree.kind(child) {
            NodeKind::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}
