use std::borrow::Cow;

use futures_util::stream::BoxStream;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::pagination::{Page, PageRequest, PaginationState, Query};
use crate::post::Post;
use crate::thing::Thing;

/// Client for the public Reddit JSON API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RedditClient {
    http: Client,
    config: ClientConfig,
    extractor: Extractor,
}

impl RedditClient {
    /// Create a client for `https://www.reddit.com` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::Client)?;

        Self::with_http_client(http, config)
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// The configured user agent and timeout are not applied to `http`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_http_client(http: Client, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::new(config.site_url());
        Ok(Self {
            http,
            config,
            extractor,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `<base><path>.json?<query>`, with a leading `/` added to `path` if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL does not parse.
    pub fn request_url(&self, path: &str, query: &Query) -> Result<Url> {
        let path: Cow<'_, str> = if path.starts_with('/') {
            Cow::Borrowed(path)
        } else {
            Cow::Owned(format!("/{path}"))
        };
        let mut url = Url::parse(&format!("{}{path}.json", self.config.site_url()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    /// Fetch and decode the JSON document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] if the request fails, [`Error::Status`] for a
    /// non-success response and [`Error::Parse`] if the body is not JSON.
    pub async fn get(&self, path: &str, query: &Query) -> Result<Value> {
        let url = self.request_url(path, query)?;
        debug!(url = %url, "Fetching");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Network {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|e| Error::Network {
            url: url.to_string(),
            source: e,
        })?;
        trace!(url = %url, bytes = body.len(), "Received response");

        serde_json::from_slice(&body).map_err(|e| Error::Parse {
            url: url.to_string(),
            source: e,
        })
    }

    /// Fetch the listing or thread at `path` and extract its posts.
    ///
    /// `query` is forwarded verbatim (e.g. `sort`, `t`, `limit`, `after`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not JSON.
    pub async fn fetch_posts(&self, path: &str, query: &Query) -> Result<Page> {
        self.execute(PageRequest::listing(path, query)).await
    }

    /// Deprecated alias of [`fetch_posts`](Self::fetch_posts).
    ///
    /// # Errors
    ///
    /// Same as [`fetch_posts`](Self::fetch_posts).
    #[deprecated(note = "use `fetch_posts` instead")]
    pub async fn get_posts(&self, path: &str, query: &Query) -> Result<Page> {
        warn!("get_posts is deprecated and will be removed in future versions of fetch-reddit, please use fetch_posts instead");
        self.fetch_posts(path, query).await
    }

    /// Run one more fetch cycle from `state`. `Done` yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not JSON.
    pub async fn advance(&self, state: &PaginationState) -> Result<Page> {
        match state.next_request(self.config.children_batch_size) {
            Some(request) => self.execute(request).await,
            None => Ok(Page::default()),
        }
    }

    /// Fetch the page after `page`, or `None` if it was the last one.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not JSON.
    pub async fn load_more(&self, page: &Page) -> Result<Option<Page>> {
        if !page.has_more() {
            return Ok(None);
        }
        self.advance(&page.next).await.map(Some)
    }

    /// Every post reachable from `path`, following pagination until it ends.
    ///
    /// Pages are requested one at a time, only as the stream is polled. The
    /// stream ends after the first error.
    #[must_use]
    pub fn stream_posts(&self, path: &str, query: Query) -> BoxStream<'static, Result<Post>> {
        let client = self.clone();
        let path = path.to_string();

        Box::pin(async_stream::stream! {
            let mut result = client.fetch_posts(&path, &query).await;
            loop {
                let page = match result {
                    Ok(page) => page,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };
                for post in page.posts {
                    yield Ok(post);
                }
                if page.next.is_done() {
                    break;
                }
                result = client.advance(&page.next).await;
            }
        })
    }

    async fn execute(&self, request: PageRequest) -> Result<Page> {
        let value = self.get(&request.path, &request.query).await?;
        let thing = Thing::from_value(value);
        let path = request.path.clone();
        let (posts, next) = request.complete(&thing, &self.extractor);
        debug!(path = %path, posts = posts.len(), has_more = !next.is_done(), "Extracted posts");
        Ok(Page { posts, next })
    }
}
