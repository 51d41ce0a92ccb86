//! Feed fetcher and object-storage job tests

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use race_feed_simulator::config::StorageJobConfig;
use race_feed_simulator::jobs::{FeedFetcher, JobError, R2Client, StorageSyncJob};
use race_feed_simulator::RaceEngine;

use super::common::TestServer;

const OBJECTS: &str = "/accounts/acct-1/r2/buckets/race-data/objects";

fn sample_feed() -> Value {
    serde_json::to_value(RaceEngine::with_seed(5).snapshot()).unwrap()
}

async fn feed_server(body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live-feed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn storage_config(feed_url: String, api_base_url: String) -> StorageJobConfig {
    StorageJobConfig {
        live_feed_url: feed_url,
        bucket_name: "race-data".into(),
        account_id: "acct-1".into(),
        api_token: "r2-token".into(),
        custom_domain: None,
        api_base_url,
    }
}

fn storage_job(config: &StorageJobConfig) -> StorageSyncJob<R2Client> {
    let fetcher = FeedFetcher::new(config.live_feed_url.clone()).unwrap();
    StorageSyncJob::new(fetcher, R2Client::new(config).unwrap())
}

#[tokio::test]
async fn test_fetch_feed() {
    let feed = feed_server(sample_feed()).await;
    let fetcher = FeedFetcher::new(format!("{}/live-feed", feed.uri())).unwrap();

    let body = fetcher.fetch().await.unwrap();
    assert_eq!(body["vehicles"].as_array().unwrap().len(), 40);
}

#[tokio::test]
async fn test_fetch_error_status() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&feed)
        .await;

    let fetcher = FeedFetcher::new(format!("{}/live-feed", feed.uri())).unwrap();
    assert!(matches!(fetcher.fetch().await, Err(JobError::Fetch(_))));
}

#[tokio::test]
async fn test_fetch_empty_body_is_no_data() {
    let feed = feed_server(json!({})).await;
    let fetcher = FeedFetcher::new(format!("{}/live-feed", feed.uri())).unwrap();
    assert!(matches!(fetcher.fetch().await, Err(JobError::Fetch(_))));
}

#[tokio::test]
async fn test_fetch_unreachable() {
    let fetcher = FeedFetcher::new("http://127.0.0.1:1/live-feed").unwrap();
    assert!(matches!(fetcher.fetch().await, Err(JobError::Fetch(_))));
}

#[tokio::test]
async fn test_storage_first_export() {
    let feed = feed_server(sample_feed()).await;
    let r2 = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path(format!("{}/manifest.json", OBJECTS)))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&r2)
        .await;
    Mock::given(method("PUT"))
        .and(header("authorization", "Bearer r2-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&r2)
        .await;

    let config = storage_config(format!("{}/live-feed", feed.uri()), r2.uri());
    let report = storage_job(&config).sync().await.unwrap();

    assert!(report.first_export);
    assert!(report.is_success());
    assert_eq!(
        report.uploaded,
        vec!["leaderboard.csv", "race_metadata.csv", "manifest.json"]
    );

    let requests = r2.received_requests().await.unwrap();
    let puts: Vec<_> = requests
        .iter()
        .filter(|r| r.method == wiremock::http::Method::Put)
        .collect();
    assert_eq!(puts.len(), 3);

    let leaderboard = String::from_utf8(puts[0].body.clone()).unwrap();
    assert_eq!(leaderboard.lines().count(), 41);
    assert!(leaderboard.starts_with("last_lap_time,vehicle_manufacturer"));

    let manifest: Value = serde_json::from_slice(&puts[2].body).unwrap();
    assert_eq!(manifest["files"]["leaderboard"], "leaderboard.csv");
    assert_eq!(manifest["version"].as_str().unwrap().len(), 14);
}

#[tokio::test]
async fn test_storage_partial_failure() {
    let feed = feed_server(sample_feed()).await;
    let r2 = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&r2)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{}/leaderboard.csv", OBJECTS)))
        .respond_with(ResponseTemplate::new(403))
        .mount(&r2)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&r2)
        .await;

    let config = storage_config(format!("{}/live-feed", feed.uri()), r2.uri());
    let job = storage_job(&config);
    let report = job.sync().await.unwrap();

    assert!(!report.first_export);
    assert_eq!(report.failed, vec!["leaderboard.csv"]);
    assert_eq!(report.uploaded, vec!["race_metadata.csv", "manifest.json"]);
    assert!(!job.run_once().await);
}

#[tokio::test]
async fn test_storage_fetch_failure_uploads_nothing() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&feed)
        .await;

    let r2 = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&r2)
        .await;

    let config = storage_config(format!("{}/live-feed", feed.uri()), r2.uri());
    assert!(!storage_job(&config).run_once().await);
}

#[tokio::test]
async fn test_storage_from_live_server() {
    let server = TestServer::spawn_with_seed(21).await;
    let r2 = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&r2)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&r2)
        .await;

    let config = storage_config(server.url("/live-feed"), r2.uri());
    assert!(storage_job(&config).run_once().await);
}
