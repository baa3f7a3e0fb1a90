//! Shared constants used across the crate.

/// Base URL for the public Reddit JSON API and permalinks.
pub const REDDIT_URL: &str = "https://www.reddit.com";

/// Endpoint used to expand truncated comment trees.
pub const MORE_CHILDREN_PATH: &str = "/api/morechildren";

/// Maximum number of child ids the `morechildren` endpoint accepts per request.
pub const MORE_CHILDREN_BATCH_SIZE: usize = 500;

/// Max length of remaining comment text to use as a title for a link.
pub const INFER_TITLE_MAX_LENGTH: usize = 128;

/// Thumbnail values Reddit uses when a post has no real preview image.
pub const THUMBNAIL_PLACEHOLDERS: &[&str] = &["default", "self", "nsfw"];

/// User agent sent with every API request.
///
/// Reddit throttles generic client user agents aggressively, so requests
/// identify the library by name and version.
pub const USER_AGENT: &str = concat!("fetch-reddit/", env!("CARGO_PKG_VERSION"));

pub const KIND_COMMENT: &str = "t1";
pub const KIND_POST: &str = "t3";
pub const KIND_LISTING: &str = "Listing";
pub const KIND_MORE: &str = "more";
