use chrono::{DateTime, Utc};

use super::links::{contains_link, LinkMatch};
use super::markdown::strip_emphasis;
use super::thumbnail::resolve_thumbnail;
use crate::constants::INFER_TITLE_MAX_LENGTH;
use crate::post::{Post, PostKind};
use crate::thing::ItemData;

/// Build the record for a link submission.
pub(crate) fn post_from_submission(site_url: &str, item: &ItemData) -> Post {
    let url = item.url.clone().unwrap_or_default();
    Post {
        id: item.id.clone(),
        title: item.title.clone(),
        thumbnail: resolve_thumbnail(item, &url),
        url,
        created: created_at(item.created_utc),
        author: item.author.clone(),
        score: item.score,
        subreddit: item.subreddit.clone(),
        permalink: permalink(site_url, item, ""),
        kind: PostKind::Submission {
            num_comments: item.num_comments,
        },
    }
}

/// Build the record for a link found in the text of `item`.
pub(crate) fn post_from_comment(
    site_url: &str,
    item: &ItemData,
    text: &str,
    link: &LinkMatch<'_>,
    path: &str,
) -> Post {
    let title = link
        .title
        .clone()
        .or_else(|| infer_title(&link.remove_from(text)))
        .map(|t| strip_emphasis(&t));

    Post {
        id: format!("{}:{}", item.id, link.offset),
        title,
        url: link.url.to_string(),
        created: created_at(item.created_utc),
        author: item.author.clone(),
        score: item.score,
        subreddit: item.subreddit.clone(),
        thumbnail: resolve_thumbnail(item, link.url),
        permalink: permalink(site_url, item, path),
        kind: PostKind::Comment {
            over_18: item.over_18,
            comment_id: item.id.clone(),
        },
    }
}

/// Use the rest of a short comment as the title of its only link.
fn infer_title(remaining: &str) -> Option<String> {
    let remaining = remaining.trim();
    // A bare link has no title at all, rather than an empty one
    if remaining.is_empty()
        || remaining.chars().count() >= INFER_TITLE_MAX_LENGTH
        || contains_link(remaining)
    {
        return None;
    }
    Some(remaining.to_string())
}

/// Absolute permalink: the API's own when present, else `<site>/<path>/<id>`.
pub(crate) fn permalink(site_url: &str, item: &ItemData, path: &str) -> String {
    if let Some(link) = item.permalink.as_deref().filter(|p| !p.is_empty()) {
        return format!("{site_url}{link}");
    }
    let path = path.trim_matches('/');
    if path.is_empty() {
        format!("{site_url}/{}", item.id)
    } else {
        format!("{site_url}/{path}/{}", item.id)
    }
}

/// `created_utc` is in seconds; missing values map to the epoch.
fn created_at(created_utc: Option<f64>) -> DateTime<Utc> {
    let millis = (created_utc.unwrap_or(0.0) * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}
