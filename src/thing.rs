//! Raw API nodes.
//!
//! Reddit responses are trees of `{ "kind": ..., "data": ... }` objects mixed
//! with plain arrays and, for `morechildren`, a `{ "json": { "data": { "things":
//! [...] } } }` envelope. Everything is decoded into the closed [`Thing`] union
//! up front; shapes that are not recognized become [`Thing::Unknown`] rather
//! than an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, trace};

use crate::constants::{KIND_COMMENT, KIND_LISTING, KIND_MORE, KIND_POST};

/// A decoded API node.
#[derive(Debug, Clone, PartialEq)]
pub enum Thing {
    /// A bare JSON array, e.g. the `[post, comments]` pair of a thread page.
    Many(Vec<Thing>),
    /// The `json.data.things` envelope returned by `morechildren`.
    Envelope(Vec<Thing>),
    Listing(Listing),
    /// A submission (`t3`).
    Link(Box<ItemData>),
    /// A comment (`t1`).
    Comment(Box<ItemData>),
    /// A truncation stub standing in for comments that were not inlined.
    More(MoreData),
    Unknown,
}

/// A paginated collection of things.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub after: Option<String>,
    pub children: Vec<Thing>,
}

/// The fields of a submission or comment that extraction cares about.
///
/// Pass-through fields of an unexpected type decode as `None` so that one odd
/// value does not drop the whole item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemData {
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub created_utc: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub author: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub score: Option<i64>,
    #[serde(deserialize_with = "lenient")]
    pub subreddit: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub permalink: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub num_comments: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub over_18: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub is_self: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub selftext: Option<String>,
    /// Reddit sends `""` when a comment has no replies.
    #[serde(deserialize_with = "deserialize_replies")]
    pub replies: Option<Listing>,
}

impl ItemData {
    #[must_use]
    pub fn is_self(&self) -> bool {
        self.is_self.unwrap_or(false)
    }

    /// Comment body or self-post text, whichever is present.
    #[must_use]
    pub fn text(&self) -> &str {
        [self.body.as_deref(), self.selftext.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

/// A `more` stub: the ids of child comments to request on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MoreData {
    pub id: String,
    pub parent_id: String,
    pub children: Vec<String>,
}

impl Thing {
    /// Decode an arbitrary JSON value. Never fails.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Many(items.into_iter().map(Self::from_value).collect()),
            Value::Object(mut map) => {
                if let Some(envelope) = map.remove("json").filter(|v| !v.is_null()) {
                    return Self::Envelope(things_from_envelope(envelope));
                }
                let kind = map
                    .get("kind")
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned);
                let data = map.remove("data").unwrap_or(Value::Null);
                match kind.as_deref() {
                    Some(KIND_LISTING) => decode(data, Self::Listing),
                    Some(KIND_POST) => decode(data, |d| Self::Link(Box::new(d))),
                    Some(KIND_COMMENT) => decode(data, |d| Self::Comment(Box::new(d))),
                    Some(KIND_MORE) => decode(data, Self::More),
                    other => {
                        trace!(kind = ?other, "Ignoring unrecognized node");
                        Self::Unknown
                    }
                }
            }
            _ => Self::Unknown,
        }
    }

    /// The last element of an array or envelope; any other node is returned as is.
    #[must_use]
    pub fn tail(&self) -> Option<&Self> {
        match self {
            Self::Many(items) | Self::Envelope(items) => items.last(),
            other => Some(other),
        }
    }
}

impl<'de> Deserialize<'de> for Thing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

fn decode<T, F>(data: Value, wrap: F) -> Thing
where
    T: for<'de> Deserialize<'de>,
    F: FnOnce(T) -> Thing,
{
    match serde_json::from_value(data) {
        Ok(decoded) => wrap(decoded),
        Err(e) => {
            debug!("Failed to decode node data: {e}");
            Thing::Unknown
        }
    }
}

fn things_from_envelope(mut envelope: Value) -> Vec<Thing> {
    let things = envelope
        .pointer_mut("/data/things")
        .map(Value::take)
        .unwrap_or(Value::Null);
    match Thing::from_value(things) {
        Thing::Many(items) => items,
        Thing::Unknown => Vec::new(),
        other => vec![other],
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .map_err(|e| trace!("Ignoring field of unexpected type: {e}"))
        .ok())
}

fn deserialize_replies<'de, D>(deserializer: D) -> Result<Option<Listing>, D::Error>
where
    D: Deserializer<'de>,
{
    match Thing::deserialize(deserializer)? {
        Thing::Listing(listing) => Ok(Some(listing)),
        _ => Ok(None),
    }
}
