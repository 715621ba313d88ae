//! Image URL normalization.

use std::sync::LazyLock;

use regex::Regex;

/// Extension appended to direct-image URLs that lack one.
pub const DEFAULT_EXTENSION: &str = ".png";

/// Host serving direct image files.
const DIRECT_HOST: &str = "i.imgur.com";

/// Gallery page: `imgur.com/<id>`.
static GALLERY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"imgur\.com/([a-zA-Z0-9]+)").expect("valid gallery regex"));

/// Recognized raster extensions at the end of a URL.
static IMAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp)$").expect("valid extension regex"));

/// Normalize a user-entered image URL.
///
/// - Surrounding whitespace is trimmed.
/// - A gallery page (`imgur.com/<id>`) becomes `https://i.imgur.com/<id>.png`.
/// - A direct link without a recognized image extension gets `.png` appended.
/// - Anything else is returned unchanged.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    if url.contains("imgur.com") && !url.contains(DIRECT_HOST) {
        if let Some(id) = GALLERY_ID.captures(url).and_then(|c| c.get(1)) {
            return format!("https://{DIRECT_HOST}/{}{DEFAULT_EXTENSION}", id.as_str());
        }
    }

    if url.contains(DIRECT_HOST) && !IMAGE_EXTENSION.is_match(url) {
        return format!("{url}{DEFAULT_EXTENSION}");
    }

    url.to_string()
}
