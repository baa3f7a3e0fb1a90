//! fetch-reddit library.
//!
//! Fetches listings and comment threads from Reddit's public JSON API and
//! flattens them into a list of [`Post`] records: link submissions, plus every
//! link found in comment and self-post text. Each fetch also returns a
//! [`PaginationState`] describing how to load the next page.
//!
//! ```no_run
//! # async fn demo() -> fetch_reddit::Result<()> {
//! use fetch_reddit::{Query, RedditClient};
//!
//! let client = RedditClient::new()?;
//! let page = client.fetch_posts("/r/rust", &Query::new()).await?;
//! for post in &page.posts {
//!     println!("{} {}", post.url, post.title.as_deref().unwrap_or(""));
//! }
//! if let Some(next) = client.load_more(&page).await? {
//!     println!("{} more", next.posts.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod pagination;
pub mod post;
pub mod thing;

pub use client::RedditClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{Error, Result};
pub use extract::{extract_posts, Extractor};
pub use pagination::{Page, PageRequest, PaginationState, Query};
pub use post::{Post, PostKind};
pub use thing::Thing;
