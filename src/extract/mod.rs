//! Flatten API responses into [`Post`] records.

pub mod links;
pub mod markdown;
mod normalize;
pub mod thumbnail;

use tracing::trace;

use crate::constants::REDDIT_URL;
use crate::post::Post;
use crate::thing::{ItemData, Thing};

pub use links::{find_links, LinkMatch};
pub use markdown::strip_emphasis;
pub use thumbnail::resolve_thumbnail;

/// Extract posts from a decoded response using `https://www.reddit.com` for
/// permalinks.
///
/// `path` is the listing path the response was fetched from; it is only used
/// to synthesize permalinks for items that lack one.
#[must_use]
pub fn extract_posts(thing: &Thing, path: &str) -> Vec<Post> {
    Extractor::default().extract_posts(thing, path)
}

/// Walks decoded API trees.
#[derive(Debug, Clone)]
pub struct Extractor {
    site_url: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(REDDIT_URL)
    }
}

impl Extractor {
    #[must_use]
    pub fn new(site_url: &str) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// All posts in `thing`, depth-first in document order.
    #[must_use]
    pub fn extract_posts(&self, thing: &Thing, path: &str) -> Vec<Post> {
        let mut posts = Vec::new();
        self.collect(thing, path, &mut posts);
        posts
    }

    fn collect(&self, thing: &Thing, path: &str, posts: &mut Vec<Post>) {
        match thing {
            Thing::Many(items) | Thing::Envelope(items) => {
                for item in items {
                    self.collect(item, path, posts);
                }
            }
            Thing::Listing(listing) => {
                for child in &listing.children {
                    self.collect(child, path, posts);
                }
            }
            Thing::Link(item) if !item.is_self() => {
                posts.push(normalize::post_from_submission(&self.site_url, item));
            }
            Thing::Link(item) | Thing::Comment(item) => {
                self.collect_from_text(item, path, posts);
            }
            Thing::More(_) | Thing::Unknown => {}
        }
    }

    /// Links in a comment (or self-post) body, followed by those in its replies.
    #[must_use]
    pub fn extract_from_comment(&self, thing: &Thing, path: &str) -> Vec<Post> {
        let mut posts = Vec::new();
        if let Thing::Comment(item) | Thing::Link(item) = thing {
            self.collect_from_text(item, path, &mut posts);
        }
        posts
    }

    fn collect_from_text(&self, item: &ItemData, path: &str, posts: &mut Vec<Post>) {
        let text = item.text();
        let before = posts.len();
        posts.extend(
            find_links(text)
                .map(|link| normalize::post_from_comment(&self.site_url, item, text, &link, path)),
        );
        trace!(id = %item.id, links = posts.len() - before, "Scanned comment text");

        let Some(replies) = &item.replies else {
            return;
        };
        for reply in &replies.children {
            if let Thing::Comment(reply) = reply {
                self.collect_from_text(reply, path, posts);
            }
        }
    }
}
