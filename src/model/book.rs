use super::section::{Section, TextSection};

/// A converted book: metadata plus chapters of sentence/image sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "camelCase"))]
pub struct Book {
    pub title: String,
    #[cfg_attr(feature = "cli", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub authors: Vec<String>,
    #[cfg_attr(feature = "cli", serde(default, skip_serializing_if = "Option::is_none"))]
    pub language: Option<String>,
    pub cover_image: Option<String>,
    /// Referenced image filenames, each at most once, in first-seen order.
    pub images: Vec<String>,
    pub chapters: Vec<Chapter>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Total number of sections across all chapters.
    pub fn section_count(&self) -> usize {
        self.chapters.iter().map(|c| c.sections.len()).sum()
    }

    /// Iterate over every text section in reading order.
    pub fn text_sections(&self) -> impl Iterator<Item = &TextSection> {
        self.chapters
            .iter()
            .flat_map(|c| c.sections.iter())
            .filter_map(Section::as_text)
    }
}

/// An ordered run of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
pub struct Chapter {
    pub sections: Vec<Section>,
}

impl Chapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// True when the chapter holds at least one text section.
    pub fn has_text(&self) -> bool {
        self.sections.iter().any(Section::is_text)
    }

    /// True when the chapter has sections and none of them are text.
    pub fn is_image_only(&self) -> bool {
        !self.is_empty() && !self.has_text()
    }
}
