//! Object-storage sync job

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{error, info, warn};

use super::{http_client, FeedFetcher, JobError, JobResult, FETCH_TIMEOUT};
use crate::config::StorageJobConfig;
use crate::export::{
    feed_vehicles, leaderboard_csv, race_metadata_csv, ExportManifest, LEADERBOARD_KEY,
    MANIFEST_KEY, RACE_METADATA_KEY,
};

/// A bucket the sync job can publish objects to
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> JobResult<()>;

    /// Whether the object exists
    async fn head_object(&self, key: &str) -> JobResult<bool>;

    /// Where readers fetch the object from
    fn public_url(&self, key: &str) -> String;
}

/// Cloudflare R2 through the account-scoped REST API
#[derive(Debug, Clone)]
pub struct R2Client {
    http: reqwest::Client,
    api_base_url: String,
    account_id: String,
    bucket: String,
    api_token: String,
    custom_domain: Option<String>,
}

impl R2Client {
    pub fn new(config: &StorageJobConfig) -> JobResult<Self> {
        Ok(Self {
            http: http_client(FETCH_TIMEOUT)?,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            bucket: config.bucket_name.clone(),
            api_token: config.api_token.clone(),
            custom_domain: config.custom_domain.clone(),
        })
    }

    pub fn object_url(&self, key: &str) -> String {
        format!(
            "{}/accounts/{}/r2/buckets/{}/objects/{}",
            self.api_base_url, self.account_id, self.bucket, key
        )
    }
}

#[async_trait]
impl ObjectStore for R2Client {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> JobResult<()> {
        let operation = format!("put {}", key);
        let response = self
            .http
            .put(self.object_url(key))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| JobError::destination(operation.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobError::destination(
                operation,
                format!("HTTP {}: {}", status, body),
            ));
        }
        Ok(())
    }

    async fn head_object(&self, key: &str) -> JobResult<bool> {
        let response = self
            .http
            .head(self.object_url(key))
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| JobError::destination(format!("head {}", key), e))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(JobError::destination(
                format!("head {}", key),
                format!("HTTP {}", status),
            )),
        }
    }

    fn public_url(&self, key: &str) -> String {
        match &self.custom_domain {
            Some(domain) => format!("https://{}/{}", domain, key),
            None => format!(
                "https://{}.r2.cloudflarestorage.com/{}/{}",
                self.account_id, self.bucket, key
            ),
        }
    }
}

/// What a storage sync did; failed puts do not stop the later ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageSyncReport {
    pub uploaded: Vec<String>,
    pub failed: Vec<String>,
    /// No manifest existed before this run
    pub first_export: bool,
}

impl StorageSyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Publishes the feed as CSV files plus a manifest
pub struct StorageSyncJob<O> {
    fetcher: FeedFetcher,
    store: O,
}

impl<O: ObjectStore> StorageSyncJob<O> {
    pub fn new(fetcher: FeedFetcher, store: O) -> Self {
        Self { fetcher, store }
    }

    pub fn store(&self) -> &O {
        &self.store
    }

    /// Run one sync, logging the outcome
    pub async fn run_once(&self) -> bool {
        match self.sync().await {
            Ok(report) if report.is_success() => {
                info!(uploaded = report.uploaded.len(), at = %Utc::now(), "Export completed successfully");
                true
            }
            Ok(report) => {
                error!(failed = ?report.failed, "Export finished with failed uploads");
                false
            }
            Err(e) => {
                error!(error = %e, "Export failed");
                false
            }
        }
    }

    pub async fn sync(&self) -> JobResult<StorageSyncReport> {
        info!(url = %self.fetcher.url(), "Fetching live feed data");
        let feed = self.fetcher.fetch().await?;

        let first_export = match self.store.head_object(MANIFEST_KEY).await {
            Ok(exists) => !exists,
            Err(e) => {
                warn!(error = %e, "Could not check for an existing manifest");
                false
            }
        };

        let vehicles = feed_vehicles(&feed).unwrap_or_default();
        let manifest = ExportManifest::new(&feed, Utc::now());
        let uploads = [
            (LEADERBOARD_KEY, leaderboard_csv(vehicles)?, "text/csv"),
            (RACE_METADATA_KEY, race_metadata_csv(&feed)?, "text/csv"),
            (MANIFEST_KEY, manifest.to_json()?, "application/json"),
        ];

        let mut report = StorageSyncReport {
            first_export,
            ..Default::default()
        };

        for (key, body, content_type) in uploads {
            match self.store.put_object(key, body.into_bytes(), content_type).await {
                Ok(()) => {
                    info!(key, "Uploaded object");
                    report.uploaded.push(key.to_string());
                }
                Err(e) => {
                    error!(key, error = %e, "Upload failed");
                    report.failed.push(key.to_string());
                }
            }
        }

        if first_export && report.is_success() {
            self.print_public_urls();
        }

        Ok(report)
    }

    fn print_public_urls(&self) {
        let rule = "=".repeat(60);
        println!("\n{}", rule);
        println!("PUBLIC URLS FOR FRONTEND ACCESS:");
        println!("{}", rule);
        println!("Leaderboard CSV: {}", self.store.public_url(LEADERBOARD_KEY));
        println!("Race Metadata CSV: {}", self.store.public_url(RACE_METADATA_KEY));
        println!("Manifest: {}", self.store.public_url(MANIFEST_KEY));
        println!("{}\n", rule);
    }
}
