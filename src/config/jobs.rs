//! Upload job configuration
//!
//! Both jobs read their settings once at startup from the environment and
//! fail hard when a required value is missing.

use std::path::PathBuf;

use crate::jobs::{JobError, JobResult};

/// Default location of the mock feed
pub const DEFAULT_LIVE_FEED_URL: &str = "http://localhost:5000/live-feed";

/// Default Cloudflare API root
pub const DEFAULT_CLOUDFLARE_API_URL: &str = "https://api.cloudflare.com/client/v4";

/// Settings for the spreadsheet sync job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsJobConfig {
    /// Service-account JSON key file
    pub credentials_path: PathBuf,
    pub live_feed_url: String,
    pub sheet_name: String,
}

impl SheetsJobConfig {
    pub fn from_env() -> JobResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> JobResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials_path = PathBuf::from(
            non_empty(&lookup, "GOOGLE_CREDENTIALS_PATH")
                .unwrap_or_else(|| "pitstops-dev.json".to_string()),
        );

        if !credentials_path.exists() {
            return Err(JobError::Config(format!(
                "Credentials file not found at {}. Set GOOGLE_CREDENTIALS_PATH",
                credentials_path.display()
            )));
        }

        Ok(Self {
            credentials_path,
            live_feed_url: non_empty(&lookup, "LIVE_FEED_URL")
                .unwrap_or_else(|| DEFAULT_LIVE_FEED_URL.to_string()),
            sheet_name: non_empty(&lookup, "GSHEET_NAME")
                .unwrap_or_else(|| "live-feed-dev".to_string()),
        })
    }
}

/// Settings for the object-storage sync job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageJobConfig {
    pub live_feed_url: String,
    pub bucket_name: String,
    pub account_id: String,
    pub api_token: String,
    /// Public hostname bound to the bucket, if any
    pub custom_domain: Option<String>,
    pub api_base_url: String,
}

impl StorageJobConfig {
    pub fn from_env() -> JobResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> JobResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            non_empty(&lookup, key).ok_or_else(|| {
                JobError::Config(format!("Missing required environment variable {}", key))
            })
        };

        Ok(Self {
            live_feed_url: non_empty(&lookup, "LIVE_FEED_URL")
                .unwrap_or_else(|| DEFAULT_LIVE_FEED_URL.to_string()),
            bucket_name: required("R2_BUCKET_NAME")?,
            account_id: required("CLOUDFLARE_ACCOUNT_ID")?,
            api_token: required("CLOUDFLARE_API_TOKEN")?,
            custom_domain: non_empty(&lookup, "R2_CUSTOM_DOMAIN")
                .map(|d| d.trim_end_matches('/').to_string()),
            api_base_url: non_empty(&lookup, "CLOUDFLARE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CLOUDFLARE_API_URL.to_string()),
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}
