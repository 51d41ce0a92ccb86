//! Upload jobs
//!
//! Each job runs one fetch/upload cycle against the live feed: it pulls a
//! snapshot over HTTP, turns it into the leaderboard and race-metadata
//! tables, and writes them to an external store. There is no retry; a failed
//! run is reported and the next scheduled run starts from scratch.

mod credentials;
mod error;
mod sheets;
mod storage;

pub use credentials::*;
pub use error::*;
pub use sheets::*;
pub use storage::*;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

/// Live feed request timeout
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client settings for the jobs
pub(crate) fn http_client(timeout: Duration) -> JobResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("race-feed-simulator/", env!("CARGO_PKG_VERSION"))),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| JobError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Reads one snapshot from the live feed
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    http: reqwest::Client,
    url: String,
}

impl FeedFetcher {
    pub fn new(url: impl Into<String>) -> JobResult<Self> {
        Self::with_timeout(url, FETCH_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> JobResult<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the feed as an opaque JSON object
    ///
    /// An empty or non-object body counts as no data.
    pub async fn fetch(&self) -> JobResult<Value> {
        debug!(url = %self.url, "Fetching live feed");

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| JobError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, status = status.as_u16(), "Live feed returned an error status");
            return Err(JobError::Fetch(format!("HTTP {} from {}", status, self.url)));
        }

        let feed: Value = response
            .json()
            .await
            .map_err(|e| JobError::Fetch(format!("Invalid JSON: {}", e)))?;

        match feed.as_object() {
            Some(map) if !map.is_empty() => Ok(feed),
            _ => Err(JobError::Fetch("No data received from live feed".to_string())),
        }
    }
}
