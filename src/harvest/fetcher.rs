//! HTTP fetcher
//!
//! All requests of a run go through one shared client so that the site's
//! session cookie is reused. A fetch is a single attempt: transport errors and
//! non-success statuses are returned to the caller, which logs and moves on.

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Maximum number of redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// A request that produced no usable page
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// Timeout, connection failure or unreadable body
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
}

impl FetchFailure {
    /// URL of the failed request
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } => url,
        }
    }
}

/// Formats the user agent: `Name/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use bill_harvest::config::UserAgentConfig;
/// use bill_harvest::harvest::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "BillHarvest".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages as text over a shared client
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config, timeout)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns its body
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Body of a 2xx response
    /// * `Err(FetchFailure)` - Transport error or non-success status
    pub async fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        tracing::debug!("GET {}", url);

        let transport = |source: reqwest::Error| FetchFailure::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}
