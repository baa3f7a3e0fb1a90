use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by [`RedditClient`](crate::RedditClient).
///
/// Unexpected API shapes are never an error: unrecognized nodes simply yield
/// no posts.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (DNS, connection, transport timeout).
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    /// The response body was not valid JSON.
    #[error("failed to parse JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
