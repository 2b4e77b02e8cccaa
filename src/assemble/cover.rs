//! Cover image selection.

use crate::images::normalize_image_ref;

/// Pick the cover among the book's images.
///
/// Preference order:
/// 1. the cover declared in the package document, if the text references it
/// 2. the first image whose stem contains `cover` (ASCII case-insensitive)
/// 3. the first image
pub fn choose_cover(images: &[String], declared: Option<&str>) -> Option<String> {
    if let Some(name) = declared.and_then(normalize_image_ref)
        && images.contains(&name)
    {
        return Some(name);
    }

    images
        .iter()
        .find(|name| stem(name).to_ascii_lowercase().contains("cover"))
        .or_else(|| images.first())
        .cloned()
}

fn stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(i) => &name[..i],
    }
}
