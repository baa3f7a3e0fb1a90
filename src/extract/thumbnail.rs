use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::THUMBNAIL_PLACEHOLDERS;
use crate::thing::ItemData;

// youtu.be/<id>, youtube.com/{embed/,v/,watch?v=,watch?...&v=}<id>
static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?(?:youtu\.be/|youtube\.com/(?:embed/|v/|watch\?v=|watch\?.+&v=))([A-Za-z0-9_-]{11})(?:\S+)?$",
    )
    .expect("Invalid YouTube regex")
});

/// Thumbnail for `item` when it links to `url`.
///
/// A real thumbnail from the API wins; otherwise YouTube links get the
/// video's default preview image.
#[must_use]
pub fn resolve_thumbnail(item: &ItemData, url: &str) -> Option<String> {
    if let Some(thumbnail) = item.thumbnail.as_deref() {
        if !thumbnail.is_empty() && !THUMBNAIL_PLACEHOLDERS.contains(&thumbnail) {
            return Some(thumbnail.to_string());
        }
    }
    youtube_video_id(url).map(|id| format!("http://img.youtube.com/vi/{id}/default.jpg"))
}

/// Extract the 11-character video id from a YouTube URL.
#[must_use]
pub fn youtube_video_id(url: &str) -> Option<&str> {
    YOUTUBE_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
