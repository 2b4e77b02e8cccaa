//! Image reference registry.
//!
//! Image nodes carry hrefs like `../image/cover.jpg` or `images/p001.png#x`.
//! Sections only keep the base filename, and the book keeps each filename
//! once, in first-seen order.

use std::collections::HashSet;

use crate::util::{percent_decode, strip_fragment};

/// Reduce an image href to its base filename.
///
/// Returns `None` when nothing usable is left (empty href, trailing slash only).
pub fn normalize_image_ref(href: &str) -> Option<String> {
    let path = strip_fragment(href.trim());
    let path = path.trim_end_matches(['/', '\\']);
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let base = percent_decode(base);

    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.into_owned())
    }
}

/// Deduplicating list of image filenames.
#[derive(Debug, Clone, Default)]
pub struct ImageRegistry {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `href` and record it.
    ///
    /// Returns the base filename to store in the image section, or `None` if
    /// the href has no filename.
    pub fn register(&mut self, href: &str) -> Option<String> {
        let name = normalize_image_ref(href)?;
        if self.seen.insert(name.clone()) {
            self.order.push(name.clone());
        }
        Some(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Filenames in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn into_names(self) -> Vec<String> {
        self.order
    }
}
