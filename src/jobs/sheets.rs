//! Spreadsheet sync job

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};
use url::Url;

use super::{http_client, FeedFetcher, JobError, JobResult, ServiceAccount, SHEETS_SCOPES};
use crate::export::{feed_vehicles, leaderboard_rows, race_metadata_rows};

pub const LEADERBOARD_WORKSHEET: &str = "leaderboard";
pub const RACE_METADATA_WORKSHEET: &str = "race_metadata";
/// Worksheet every new spreadsheet starts with
pub const DEFAULT_WORKSHEET: &str = "Sheet1";

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4";
const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";
const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetHandle {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetInfo {
    /// The worksheet's `gid`
    pub sheet_id: i64,
    pub title: String,
}

/// A spreadsheet service the sync job can write to
#[async_trait]
pub trait SpreadsheetStore: Send + Sync {
    /// Open the spreadsheet with this name, creating it if needed.
    /// The flag is true when it was created.
    async fn open_or_create(&self, name: &str) -> JobResult<(SpreadsheetHandle, bool)>;

    async fn worksheets(&self, spreadsheet_id: &str) -> JobResult<Vec<WorksheetInfo>>;

    async fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> JobResult<WorksheetInfo>;

    async fn delete_worksheet(&self, spreadsheet_id: &str, sheet_id: i64) -> JobResult<()>;

    /// Replace the worksheet contents with `rows`
    async fn clear_and_append(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: &[Vec<String>],
    ) -> JobResult<()>;

    /// Anyone with the link may view
    async fn share_public_read(&self, spreadsheet_id: &str) -> JobResult<()>;

    async fn ensure_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> JobResult<WorksheetInfo> {
        let existing = self.worksheets(spreadsheet_id).await?;
        if let Some(sheet) = existing.into_iter().find(|s| s.title == title) {
            return Ok(sheet);
        }

        let sheet = self.add_worksheet(spreadsheet_id, title, rows, cols).await?;
        info!(worksheet = title, "Created worksheet");
        Ok(sheet)
    }

    /// Delete the worksheet if present; true when something was removed
    async fn remove_worksheet(&self, spreadsheet_id: &str, title: &str) -> JobResult<bool> {
        let existing = self.worksheets(spreadsheet_id).await?;
        match existing.into_iter().find(|s| s.title == title) {
            Some(sheet) => {
                self.delete_worksheet(spreadsheet_id, sheet.sheet_id).await?;
                info!(worksheet = title, "Deleted worksheet");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Public links handed to the frontend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetUrls {
    pub sheet: String,
    pub leaderboard_csv: String,
    pub race_metadata_csv: String,
}

impl SheetUrls {
    pub fn new(spreadsheet_id: &str, leaderboard_gid: i64, race_metadata_gid: i64) -> Self {
        let csv = |gid: i64| {
            format!(
                "https://docs.google.com/spreadsheets/d/{}/export?format=csv&gid={}",
                spreadsheet_id, gid
            )
        };
        Self {
            sheet: format!(
                "https://docs.google.com/spreadsheets/d/{}/edit?usp=sharing",
                spreadsheet_id
            ),
            leaderboard_csv: csv(leaderboard_gid),
            race_metadata_csv: csv(race_metadata_gid),
        }
    }

    pub fn print(&self) {
        let rule = "=".repeat(60);
        println!("\n{}", rule);
        println!("PUBLIC URLS FOR FRONTEND ACCESS:");
        println!("{}", rule);
        println!("Full Sheet URL: {}", self.sheet);
        println!("Leaderboard CSV: {}", self.leaderboard_csv);
        println!("Race Metadata CSV: {}", self.race_metadata_csv);
        println!("{}\n", rule);
    }
}

/// What a successful sync did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsSyncReport {
    pub spreadsheet_id: String,
    pub created: bool,
    /// None when the feed had no `vehicles` key
    pub vehicles_written: Option<usize>,
    /// Set only for a newly created spreadsheet
    pub urls: Option<SheetUrls>,
}

/// Copies the live feed into a two-tab spreadsheet
pub struct SheetsSyncJob<S> {
    fetcher: FeedFetcher,
    store: S,
    sheet_name: String,
}

impl<S: SpreadsheetStore> SheetsSyncJob<S> {
    pub fn new(fetcher: FeedFetcher, store: S, sheet_name: impl Into<String>) -> Self {
        Self {
            fetcher,
            store,
            sheet_name: sheet_name.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one sync, logging the outcome
    pub async fn run_once(&self) -> bool {
        match self.sync().await {
            Ok(report) => {
                info!(
                    spreadsheet_id = %report.spreadsheet_id,
                    created = report.created,
                    vehicles = ?report.vehicles_written,
                    at = %Utc::now(),
                    "Successfully updated sheets"
                );
                true
            }
            Err(e) => {
                error!(error = %e, "Sheet update failed");
                false
            }
        }
    }

    pub async fn sync(&self) -> JobResult<SheetsSyncReport> {
        info!(url = %self.fetcher.url(), "Fetching live feed data");
        let feed = self.fetcher.fetch().await?;

        let (sheet, created) = self.store.open_or_create(&self.sheet_name).await?;
        if created {
            info!(name = %self.sheet_name, id = %sheet.id, "Created new sheet");
        } else {
            info!(name = %self.sheet_name, id = %sheet.id, "Opened existing sheet");
        }

        let leaderboard = self
            .store
            .ensure_worksheet(&sheet.id, LEADERBOARD_WORKSHEET, 50, 10)
            .await?;
        let metadata = self
            .store
            .ensure_worksheet(&sheet.id, RACE_METADATA_WORKSHEET, 10, 10)
            .await?;
        self.store.remove_worksheet(&sheet.id, DEFAULT_WORKSHEET).await?;

        let urls = if created {
            if let Err(e) = self.store.share_public_read(&sheet.id).await {
                warn!(error = %e, "Error making sheet public");
            } else {
                info!("Sheet made publicly accessible");
            }
            let urls = SheetUrls::new(&sheet.id, leaderboard.sheet_id, metadata.sheet_id);
            urls.print();
            Some(urls)
        } else {
            None
        };

        let vehicles_written = match feed_vehicles(&feed) {
            Some(vehicles) => {
                self.store
                    .clear_and_append(&sheet.id, LEADERBOARD_WORKSHEET, &leaderboard_rows(vehicles))
                    .await?;
                info!(vehicles = vehicles.len(), "Updated leaderboard");
                Some(vehicles.len())
            }
            None => None,
        };

        self.store
            .clear_and_append(&sheet.id, RACE_METADATA_WORKSHEET, &race_metadata_rows(&feed))
            .await?;
        info!("Updated race metadata");

        Ok(SheetsSyncReport {
            spreadsheet_id: sheet.id,
            created,
            vehicles_written,
            urls,
        })
    }
}

/// API roots, overridable for tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    pub sheets: String,
    pub drive: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            sheets: SHEETS_API_URL.to_string(),
            drive: DRIVE_API_URL.to_string(),
        }
    }
}

/// Sheets v4 / Drive v3 over HTTP
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    token: String,
    endpoints: GoogleEndpoints,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Spreadsheet {
    spreadsheet_id: String,
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

impl From<SheetProperties> for WorksheetInfo {
    fn from(p: SheetProperties) -> Self {
        Self {
            sheet_id: p.sheet_id,
            title: p.title,
        }
    }
}

impl GoogleSheetsClient {
    /// Authenticate as the service account and build a client
    pub async fn connect(account: &ServiceAccount) -> JobResult<Self> {
        let http = http_client(super::FETCH_TIMEOUT)?;
        let token = account.fetch_access_token(&http, SHEETS_SCOPES).await?;
        info!(account = %account.client_email, "Google Sheets connection established");
        Ok(Self {
            http,
            token: token.access_token,
            endpoints: GoogleEndpoints::default(),
        })
    }

    pub fn with_token(token: impl Into<String>, endpoints: GoogleEndpoints) -> JobResult<Self> {
        Ok(Self {
            http: http_client(super::FETCH_TIMEOUT)?,
            token: token.into(),
            endpoints,
        })
    }

    fn url(base: &str, segments: &[&str]) -> JobResult<Url> {
        let mut url = Url::parse(base)
            .map_err(|e| JobError::Config(format!("Invalid API URL {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| JobError::Config(format!("Invalid API URL {}", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn sheets_url(&self, segments: &[&str]) -> JobResult<Url> {
        Self::url(&self.endpoints.sheets, segments)
    }

    fn drive_url(&self, segments: &[&str]) -> JobResult<Url> {
        Self::url(&self.endpoints.drive, segments)
    }

    async fn send<T>(&self, operation: &str, request: reqwest::RequestBuilder) -> JobResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| JobError::destination(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JobError::destination(
                operation,
                format!("HTTP {}: {}", status, body),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| JobError::destination(operation, e))
    }

    async fn find_spreadsheet(&self, name: &str) -> JobResult<Option<SpreadsheetHandle>> {
        let query = format!(
            "name='{}' and mimeType='{}' and trashed=false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME_TYPE
        );
        let request = self
            .http
            .get(self.drive_url(&["files"])?)
            .query(&[("q", query.as_str()), ("fields", "files(id,name)")]);

        let list: FileList = self.send("find spreadsheet", request).await?;
        Ok(list.files.into_iter().next().map(|f| SpreadsheetHandle {
            id: f.id,
            title: f.name,
        }))
    }

    async fn batch_update(&self, operation: &str, spreadsheet_id: &str, request: Value) -> JobResult<Value> {
        let segment = format!("{}:batchUpdate", spreadsheet_id);
        let request = self
            .http
            .post(self.sheets_url(&["spreadsheets", &segment])?)
            .json(&json!({ "requests": [request] }));
        self.send(operation, request).await
    }
}

#[async_trait]
impl SpreadsheetStore for GoogleSheetsClient {
    async fn open_or_create(&self, name: &str) -> JobResult<(SpreadsheetHandle, bool)> {
        if let Some(handle) = self.find_spreadsheet(name).await? {
            return Ok((handle, false));
        }

        let request = self
            .http
            .post(self.sheets_url(&["spreadsheets"])?)
            .json(&json!({ "properties": { "title": name } }));
        let created: Spreadsheet = self.send("create spreadsheet", request).await?;

        Ok((
            SpreadsheetHandle {
                id: created.spreadsheet_id,
                title: name.to_string(),
            },
            true,
        ))
    }

    async fn worksheets(&self, spreadsheet_id: &str) -> JobResult<Vec<WorksheetInfo>> {
        let request = self
            .http
            .get(self.sheets_url(&["spreadsheets", spreadsheet_id])?)
            .query(&[("fields", "spreadsheetId,sheets.properties")]);
        let sheet: Spreadsheet = self.send("list worksheets", request).await?;
        Ok(sheet.sheets.into_iter().map(|s| s.properties.into()).collect())
    }

    async fn add_worksheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> JobResult<WorksheetInfo> {
        let operation = format!("add worksheet {}", title);
        let reply = self
            .batch_update(
                &operation,
                spreadsheet_id,
                json!({
                    "addSheet": {
                        "properties": {
                            "title": title,
                            "gridProperties": { "rowCount": rows, "columnCount": cols }
                        }
                    }
                }),
            )
            .await?;

        let properties = reply
            .pointer("/replies/0/addSheet/properties")
            .cloned()
            .ok_or_else(|| JobError::destination(operation.as_str(), "Missing addSheet reply"))?;
        let properties: SheetProperties = serde_json::from_value(properties)
            .map_err(|e| JobError::destination(operation.as_str(), e))?;
        Ok(properties.into())
    }

    async fn delete_worksheet(&self, spreadsheet_id: &str, sheet_id: i64) -> JobResult<()> {
        self.batch_update(
            "delete worksheet",
            spreadsheet_id,
            json!({ "deleteSheet": { "sheetId": sheet_id } }),
        )
        .await?;
        Ok(())
    }

    async fn clear_and_append(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: &[Vec<String>],
    ) -> JobResult<()> {
        let clear = format!("{}:clear", title);
        let request = self
            .http
            .post(self.sheets_url(&["spreadsheets", spreadsheet_id, "values", &clear])?)
            .json(&json!({}));
        let _: Value = self.send(&format!("clear {}", title), request).await?;

        let append = format!("{}!A1:append", title);
        let request = self
            .http
            .post(self.sheets_url(&["spreadsheets", spreadsheet_id, "values", &append])?)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": rows }));
        let _: Value = self.send(&format!("append {}", title), request).await?;
        Ok(())
    }

    async fn share_public_read(&self, spreadsheet_id: &str) -> JobResult<()> {
        let request = self
            .http
            .post(self.drive_url(&["files", spreadsheet_id, "permissions"])?)
            .json(&json!({ "type": "anyone", "role": "reader" }));
        let _: Value = self.send("share spreadsheet", request).await?;
        Ok(())
    }
}
