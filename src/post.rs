use chrono::{DateTime, Utc};
use serde::Serialize;

/// A link extracted from a listing or a comment thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Item id for submissions; `<comment_id>:<offset>` for links found in text.
    ///
    /// The offset counts Unicode scalar values, so text with characters outside
    /// the Basic Multilingual Plane (emoji, for example) gives smaller offsets
    /// than UTF-16 based ids for the same link.
    pub id: String,
    pub title: Option<String>,
    pub url: String,
    pub created: DateTime<Utc>,
    pub author: Option<String>,
    pub score: Option<i64>,
    pub subreddit: Option<String>,
    pub thumbnail: Option<String>,
    pub permalink: String,
    #[serde(flatten)]
    pub kind: PostKind,
}

/// Fields that only exist for one of the two record variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostKind {
    /// A link submission.
    Submission { num_comments: Option<u64> },
    /// A link found in the body of a comment or self-post.
    Comment {
        over_18: Option<bool>,
        comment_id: String,
    },
}

impl Post {
    #[must_use]
    pub fn is_submission(&self) -> bool {
        matches!(self.kind, PostKind::Submission { .. })
    }

    #[must_use]
    pub fn num_comments(&self) -> Option<u64> {
        match self.kind {
            PostKind::Submission { num_comments } => num_comments,
            PostKind::Comment { .. } => None,
        }
    }

    /// Id of the comment the link was found in.
    #[must_use]
    pub fn comment_id(&self) -> Option<&str> {
        match &self.kind {
            PostKind::Comment { comment_id, .. } => Some(comment_id),
            PostKind::Submission { .. } => None,
        }
    }
}
