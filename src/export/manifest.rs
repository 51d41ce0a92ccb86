use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ExportResult, FieldValue};

pub const LEADERBOARD_KEY: &str = "leaderboard.csv";
pub const RACE_METADATA_KEY: &str = "race_metadata.csv";
pub const MANIFEST_KEY: &str = "manifest.json";

/// Describes one published export so readers can detect a new version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    /// Export time as `%Y%m%d%H%M%S`
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub files: ManifestFiles,
    /// Copied from the feed; `null` when the feed lacks it
    pub race_id: Option<Value>,
    pub lap_number: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestFiles {
    pub leaderboard: String,
    pub race_metadata: String,
}

impl ExportManifest {
    pub fn new(feed: &Value, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: exported_at.format("%Y%m%d%H%M%S").to_string(),
            timestamp: exported_at,
            files: ManifestFiles {
                leaderboard: LEADERBOARD_KEY.to_string(),
                race_metadata: RACE_METADATA_KEY.to_string(),
            },
            race_id: FieldValue::lookup(feed, "race_id").value().cloned(),
            lap_number: FieldValue::lookup(feed, "lap_number").value().cloned(),
        }
    }

    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
