/// The atomic unit of book content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Section {
    /// One sentence of narrative text.
    Text(TextSection),
    /// One image reference.
    Image(ImageSection),
}

/// A sentence and the tokens the analyzer produced for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
pub struct TextSection {
    pub text: String,
    #[cfg_attr(feature = "cli", serde(default))]
    pub tokens: Vec<Token>,
}

/// A reference to an image by its base filename.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "camelCase"))]
pub struct ImageSection {
    pub image_ref: String,
}

/// A lexical unit: the surface text plus opaque morphological features.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub surface: String,
    pub features: Vec<String>,
}

impl Section {
    pub fn text(text: impl Into<String>) -> Self {
        Section::Text(TextSection {
            text: text.into(),
            tokens: Vec::new(),
        })
    }

    pub fn image(image_ref: impl Into<String>) -> Self {
        Section::Image(ImageSection {
            image_ref: image_ref.into(),
        })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Section::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Section::Image(_))
    }

    pub fn as_text(&self) -> Option<&TextSection> {
        match self {
            Section::Text(t) => Some(t),
            Section::Image(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextSection> {
        match self {
            Section::Text(t) => Some(t),
            Section::Image(_) => None,
        }
    }

    pub fn image_ref(&self) -> Option<&str> {
        match self {
            Section::Image(img) => Some(&img.image_ref),
            Section::Text(_) => None,
        }
    }
}

impl Token {
    pub fn new(surface: impl Into<String>, features: Vec<String>) -> Self {
        Self {
            surface: surface.into(),
            features,
        }
    }
}
