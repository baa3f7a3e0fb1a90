//! Pagination as an explicit state machine.
//!
//! A fetch cycle turns a [`PaginationState`] into a [`PageRequest`], the
//! request's response into posts, and the response's tail into the next
//! state. Only [`RedditClient`](crate::RedditClient) touches the network;
//! everything here is pure.

use std::collections::{BTreeMap, VecDeque};

use crate::constants::MORE_CHILDREN_PATH;
use crate::extract::Extractor;
use crate::post::Post;
use crate::thing::{MoreData, Thing};

/// Query-string parameters, serialized in key order.
pub type Query = BTreeMap<String, String>;

/// Where the next page of a traversal comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaginationState {
    /// Re-fetch a listing; `query` already carries the `after` cursor.
    ListingCursor { path: String, query: Query },
    /// Expand the remaining child ids of a truncated comment tree.
    MoreChildren {
        parent: String,
        remaining: VecDeque<String>,
    },
    #[default]
    Done,
}

/// One page of results and where to continue from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub posts: Vec<Post>,
    pub next: PaginationState,
}

impl Page {
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.next.is_done()
    }
}

impl PaginationState {
    /// Continuation for a listing response fetched from `path` with `query`.
    ///
    /// The pagination marker is looked for at the tail of the response: a
    /// `more` stub, or the last listing carrying an `after` cursor. The
    /// caller's `query` is never modified.
    #[must_use]
    pub fn from_response(response: &Thing, path: &str, query: &Query) -> Self {
        match response {
            Thing::Many(items) | Thing::Envelope(items) => {
                items.last().map_or(Self::Done, |last| Self::from_response(last, path, query))
            }
            Thing::More(more) => Self::from_more(more.parent_id.clone(), more),
            Thing::Listing(listing) => {
                if let Some(after) = listing.after.as_deref().filter(|a| !a.is_empty()) {
                    let mut query = query.clone();
                    query.insert("after".to_string(), after.to_string());
                    return Self::ListingCursor {
                        path: path.to_string(),
                        query,
                    };
                }
                listing
                    .children
                    .last()
                    .map_or(Self::Done, |last| Self::from_response(last, path, query))
            }
            Thing::Link(_) | Thing::Comment(_) | Thing::Unknown => Self::Done,
        }
    }

    /// "Continue this thread" stubs carry no ids and cannot be expanded.
    fn from_more(parent: String, more: &MoreData) -> Self {
        if more.children.is_empty() {
            return Self::Done;
        }
        Self::MoreChildren {
            parent,
            remaining: more.children.iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// The request that advances this state, taking at most `batch_size`
    /// child ids off the front of a `MoreChildren` queue.
    #[must_use]
    pub fn next_request(&self, batch_size: usize) -> Option<PageRequest> {
        match self {
            Self::Done => None,
            Self::ListingCursor { path, query } => Some(PageRequest::listing(path, query)),
            Self::MoreChildren { parent, remaining } => {
                let mut remaining = remaining.clone();
                let take = batch_size.max(1).min(remaining.len());
                let batch: Vec<String> = remaining.drain(..take).collect();

                let mut query = Query::new();
                query.insert("api_type".to_string(), "json".to_string());
                query.insert("link_id".to_string(), parent.clone());
                query.insert("children".to_string(), batch.join(","));

                Some(PageRequest {
                    path: MORE_CHILDREN_PATH.to_string(),
                    query,
                    continuation: Continuation::Children {
                        parent: parent.clone(),
                        remaining,
                    },
                })
            }
        }
    }
}

/// A request to issue, plus what is needed to interpret its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub query: Query,
    continuation: Continuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Continuation {
    Listing,
    Children {
        parent: String,
        remaining: VecDeque<String>,
    },
}

impl PageRequest {
    /// First request of a listing traversal.
    #[must_use]
    pub fn listing(path: &str, query: &Query) -> Self {
        Self {
            path: path.to_string(),
            query: query.clone(),
            continuation: Continuation::Listing,
        }
    }

    /// Number of child ids requested, for `morechildren` requests.
    #[must_use]
    pub fn children_count(&self) -> usize {
        self.query
            .get("children")
            .filter(|ids| !ids.is_empty())
            .map_or(0, |ids| ids.split(',').count())
    }

    /// Turn the decoded response into posts and the next state.
    #[must_use]
    pub fn complete(self, response: &Thing, extractor: &Extractor) -> (Vec<Post>, PaginationState) {
        match self.continuation {
            Continuation::Listing => {
                let posts = extractor.extract_posts(response, &self.path);
                let next = PaginationState::from_response(response, &self.path, &self.query);
                (posts, next)
            }
            Continuation::Children { parent, remaining } => {
                let posts = extractor.extract_posts(response, "");
                let next = if !remaining.is_empty() {
                    PaginationState::MoreChildren { parent, remaining }
                } else if let Some(Thing::More(more)) = response.tail() {
                    // Expanded comments can end in another stub under the same thread
                    PaginationState::from_more(parent, more)
                } else {
                    PaginationState::Done
                };
                (posts, next)
            }
        }
    }
}
