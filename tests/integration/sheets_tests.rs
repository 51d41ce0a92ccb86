//! Spreadsheet job tests
//!
//! The job logic runs against an in-memory store; the HTTP client runs
//! against wiremock standing in for the Sheets and Drive APIs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use race_feed_simulator::jobs::{
    FeedFetcher, GoogleEndpoints, GoogleSheetsClient, JobError, JobResult, SheetsSyncJob,
    SpreadsheetHandle, SpreadsheetStore, WorksheetInfo,
};
use race_feed_simulator::RaceEngine;

/// In-memory spreadsheet with the same defaults as a new Google sheet
#[derive(Default)]
struct FakeSheets {
    exists: bool,
    fail_share: bool,
    worksheets: Mutex<BTreeMap<String, (i64, Vec<Vec<String>>)>>,
    shared: Mutex<bool>,
}

impl FakeSheets {
    fn new(exists: bool) -> Self {
        let sheets = Self {
            exists,
            ..Default::default()
        };
        sheets
            .worksheets
            .lock()
            .insert("Sheet1".to_string(), (0, Vec::new()));
        sheets
    }

    fn rows(&self, title: &str) -> Option<Vec<Vec<String>>> {
        self.worksheets.lock().get(title).map(|(_, rows)| rows.clone())
    }
}

#[async_trait]
impl SpreadsheetStore for FakeSheets {
    async fn open_or_create(&self, name: &str) -> JobResult<(SpreadsheetHandle, bool)> {
        let handle = SpreadsheetHandle {
            id: "fake-id".to_string(),
            title: name.to_string(),
        };
        Ok((handle, !self.exists))
    }

    async fn worksheets(&self, _spreadsheet_id: &str) -> JobResult<Vec<WorksheetInfo>> {
        Ok(self
            .worksheets
            .lock()
            .iter()
            .map(|(title, (id, _))| WorksheetInfo {
                sheet_id: *id,
                title: title.clone(),
            })
            .collect())
    }

    async fn add_worksheet(
        &self,
        _spreadsheet_id: &str,
        title: &str,
        _rows: u32,
        _cols: u32,
    ) -> JobResult<WorksheetInfo> {
        let mut sheets = self.worksheets.lock();
        let sheet_id = 100 + sheets.len() as i64;
        sheets.insert(title.to_string(), (sheet_id, Vec::new()));
        Ok(WorksheetInfo {
            sheet_id,
            title: title.to_string(),
        })
    }

    async fn delete_worksheet(&self, _spreadsheet_id: &str, sheet_id: i64) -> JobResult<()> {
        self.worksheets.lock().retain(|_, (id, _)| *id != sheet_id);
        Ok(())
    }

    async fn clear_and_append(
        &self,
        _spreadsheet_id: &str,
        title: &str,
        rows: &[Vec<String>],
    ) -> JobResult<()> {
        match self.worksheets.lock().get_mut(title) {
            Some((_, existing)) => {
                *existing = rows.to_vec();
                Ok(())
            }
            None => Err(JobError::destination("append", "no such worksheet")),
        }
    }

    async fn share_public_read(&self, _spreadsheet_id: &str) -> JobResult<()> {
        if self.fail_share {
            return Err(JobError::destination("share", "HTTP 403"));
        }
        *self.shared.lock() = true;
        Ok(())
    }
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

fn fetcher(feed: &MockServer) -> FeedFetcher {
    FeedFetcher::new(format!("{}/live-feed", feed.uri())).unwrap()
}

fn sample_feed() -> Value {
    serde_json::to_value(RaceEngine::with_seed(8).snapshot()).unwrap()
}

#[tokio::test]
async fn test_new_sheet_is_set_up_and_shared() {
    let feed = feed_server(sample_feed()).await;
    let job = SheetsSyncJob::new(fetcher(&feed), FakeSheets::new(false), "live-feed-test");

    let report = job.sync().await.unwrap();
    assert!(report.created);
    assert_eq!(report.vehicles_written, Some(40));
    assert!(report.urls.is_some());

    let store = job.store();
    assert!(*store.shared.lock());
    assert!(store.rows("Sheet1").is_none());

    let leaderboard = store.rows("leaderboard").unwrap();
    assert_eq!(leaderboard.len(), 41);
    assert_eq!(leaderboard[0][0], "last_lap_time");
    assert_eq!(leaderboard[1][6], "1");

    let metadata = store.rows("race_metadata").unwrap();
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[0][9], "track_name");
}

#[tokio::test]
async fn test_existing_sheet_is_not_shared() {
    let feed = feed_server(sample_feed()).await;
    let job = SheetsSyncJob::new(fetcher(&feed), FakeSheets::new(true), "live-feed-test");

    let report = job.sync().await.unwrap();
    assert!(!report.created);
    assert!(report.urls.is_none());
    assert!(!*job.store().shared.lock());
}

#[tokio::test]
async fn test_share_failure_is_not_fatal() {
    let feed = feed_server(sample_feed()).await;
    let store = FakeSheets {
        fail_share: true,
        ..FakeSheets::new(false)
    };
    let job = SheetsSyncJob::new(fetcher(&feed), store, "live-feed-test");

    assert!(job.run_once().await);
}

#[tokio::test]
async fn test_feed_without_vehicles_skips_leaderboard() {
    let feed = feed_server(json!({"lap_number": 30, "track_name": "Phoenix Raceway"})).await;
    let job = SheetsSyncJob::new(fetcher(&feed), FakeSheets::new(true), "live-feed-test");

    let report = job.sync().await.unwrap();
    assert_eq!(report.vehicles_written, None);

    let store = job.store();
    assert_eq!(store.rows("leaderboard"), Some(Vec::new()));
    let metadata = store.rows("race_metadata").unwrap();
    assert_eq!(metadata[1][0], "30");
    assert_eq!(metadata[1][1], "");
}

#[tokio::test]
async fn test_fetch_failure_fails_run() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&feed)
        .await;

    let job = SheetsSyncJob::new(fetcher(&feed), FakeSheets::new(false), "live-feed-test");
    assert!(!job.run_once().await);
    assert!(job.store().rows("leaderboard").is_none());
}

fn google_client(server: &MockServer) -> GoogleSheetsClient {
    GoogleSheetsClient::with_token(
        "test-token",
        GoogleEndpoints {
            sheets: server.uri(),
            drive: server.uri(),
        },
    )
    .unwrap()
}

async fn mount_worksheet_api(google: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/spreadsheets/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": id,
            "sheets": [{"properties": {"sheetId": 0, "title": "Sheet1"}}]
        })))
        .mount(google)
        .await;

    for (title, gid) in [("leaderboard", 11), ("race_metadata", 22)] {
        Mock::given(method("POST"))
            .and(path(format!("/spreadsheets/{}:batchUpdate", id)))
            .and(body_partial_json(json!({
                "requests": [{"addSheet": {"properties": {"title": title}}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "replies": [{"addSheet": {"properties": {"sheetId": gid, "title": title}}}]
            })))
            .expect(1)
            .mount(google)
            .await;

        for action in [format!("{}:clear", title), format!("{}!A1:append", title)] {
            Mock::given(method("POST"))
                .and(path(format!("/spreadsheets/{}/values/{}", id, action)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(1)
                .mount(google)
                .await;
        }
    }

    Mock::given(method("POST"))
        .and(path(format!("/spreadsheets/{}:batchUpdate", id)))
        .and(body_partial_json(json!({"requests": [{"deleteSheet": {"sheetId": 0}}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"replies": [{}]})))
        .expect(1)
        .mount(google)
        .await;
}

#[tokio::test]
async fn test_google_client_creates_and_shares() {
    let feed = feed_server(sample_feed()).await;
    let google = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
        .mount(&google)
        .await;
    Mock::given(method("POST"))
        .and(path("/spreadsheets"))
        .and(body_partial_json(json!({"properties": {"title": "live-feed-test"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "spreadsheetId": "sheet-123",
            "properties": {"title": "live-feed-test"}
        })))
        .expect(1)
        .mount(&google)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/sheet-123/permissions"))
        .and(body_partial_json(json!({"type": "anyone", "role": "reader"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "anyoneWithLink"})))
        .expect(1)
        .mount(&google)
        .await;
    mount_worksheet_api(&google, "sheet-123").await;

    let job = SheetsSyncJob::new(fetcher(&feed), google_client(&google), "live-feed-test");
    let report = job.sync().await.unwrap();

    assert!(report.created);
    let urls = report.urls.unwrap();
    assert!(urls.leaderboard_csv.ends_with("/d/sheet-123/export?format=csv&gid=11"));
    assert!(urls.race_metadata_csv.ends_with("gid=22"));
}

#[tokio::test]
async fn test_google_client_opens_existing() {
    let feed = feed_server(sample_feed()).await;
    let google = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .and(query_param("fields", "files(id,name)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [{"id": "sheet-456", "name": "live-feed-test"}]
        })))
        .mount(&google)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/sheet-456/permissions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&google)
        .await;
    mount_worksheet_api(&google, "sheet-456").await;

    let job = SheetsSyncJob::new(fetcher(&feed), google_client(&google), "live-feed-test");
    let report = job.sync().await.unwrap();

    assert!(!report.created);
    assert_eq!(report.spreadsheet_id, "sheet-456");
}

#[tokio::test]
async fn test_google_api_error_fails_run() {
    let feed = feed_server(sample_feed()).await;
    let google = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&google)
        .await;

    let job = SheetsSyncJob::new(fetcher(&feed), google_client(&google), "live-feed-test");
    match job.sync().await {
        Err(JobError::Destination { operation, message }) => {
            assert_eq!(operation, "find spreadsheet");
            assert!(message.contains("401"));
        }
        other => panic!("Expected destination error, got {:?}", other.map(|r| r.created)),
    }
}
