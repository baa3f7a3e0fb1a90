use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::{MORE_CHILDREN_BATCH_SIZE, REDDIT_URL, USER_AGENT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as a URL: {source}")]
    ParseUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site root used for API requests and synthesized permalinks.
    pub base_url: String,
    pub user_agent: String,
    /// Transport timeout. `None` leaves timeouts to the underlying transport.
    pub timeout: Option<Duration>,
    /// Number of child ids requested per `morechildren` call.
    pub children_batch_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: REDDIT_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: None,
            children_batch_size: MORE_CHILDREN_BATCH_SIZE,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at a local mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: Some(Duration::from_secs(10)),
            ..Self::default()
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL or the batch
    /// size is outside `1..=500`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| ConfigError::ParseUrl {
            name: "base_url".to_string(),
            source: e,
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidValue {
                name: "base_url".to_string(),
                message: format!("scheme must be http or https, got '{}'", parsed.scheme()),
            });
        }
        if self.children_batch_size == 0 || self.children_batch_size > MORE_CHILDREN_BATCH_SIZE {
            return Err(ConfigError::InvalidValue {
                name: "children_batch_size".to_string(),
                message: format!(
                    "must be between 1 and {MORE_CHILDREN_BATCH_SIZE}, got {}",
                    self.children_batch_size
                ),
            });
        }
        if self.user_agent.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "user_agent".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn site_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
