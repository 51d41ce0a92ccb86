//! Leaderboard and race-metadata tables

use serde_json::Value;

use super::{ExportError, ExportResult};

/// Leaderboard header, paired with where each column is read from a vehicle
const LEADERBOARD_FIELDS: [(&str, &str); 10] = [
    ("last_lap_time", "last_lap_time"),
    ("vehicle_manufacturer", "vehicle_manufacturer"),
    ("vehicle_number", "vehicle_number"),
    ("driver_id", "driver.driver_id"),
    ("full_name", "driver.full_name"),
    ("starting_position", "starting_position"),
    ("running_position", "running_position"),
    ("delta", "delta"),
    ("is_on_track", "is_on_track"),
    ("is_on_dvp", "is_on_dvp"),
];

/// Race-metadata header; every column is a top-level feed key
const RACE_METADATA_FIELDS: [&str; 10] = [
    "lap_number",
    "flag_state",
    "laps_in_race",
    "run_name",
    "race_id",
    "run_id",
    "series_id",
    "time_of_day_os",
    "track_id",
    "track_name",
];

/// A field of a JSON document that may not be there
///
/// Absent and `null` fields both render as the empty string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldValue<'a>(Option<&'a Value>);

impl<'a> FieldValue<'a> {
    /// Look up a dot-separated path, e.g. `driver.full_name`
    pub fn lookup(doc: &'a Value, path: &str) -> Self {
        let found = path
            .split('.')
            .try_fold(doc, |current, key| current.get(key));
        Self(found.filter(|v| !v.is_null()))
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_none()
    }

    pub fn value(&self) -> Option<&'a Value> {
        self.0
    }

    /// Cell text for this field
    pub fn render(&self) -> String {
        match self.0 {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

pub fn leaderboard_header() -> Vec<String> {
    LEADERBOARD_FIELDS.iter().map(|(name, _)| name.to_string()).collect()
}

pub fn race_metadata_header() -> Vec<String> {
    RACE_METADATA_FIELDS.iter().map(|name| name.to_string()).collect()
}

/// Header plus one row per vehicle, in input order
pub fn leaderboard_rows(vehicles: &[Value]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(vehicles.len() + 1);
    rows.push(leaderboard_header());
    rows.extend(vehicles.iter().map(|vehicle| {
        LEADERBOARD_FIELDS
            .iter()
            .map(|(_, path)| FieldValue::lookup(vehicle, path).render())
            .collect()
    }));
    rows
}

/// Header plus the single metadata row
pub fn race_metadata_rows(feed: &Value) -> Vec<Vec<String>> {
    let row = RACE_METADATA_FIELDS
        .iter()
        .map(|key| FieldValue::lookup(feed, key).render())
        .collect();
    vec![race_metadata_header(), row]
}

/// The feed's vehicle array, if it has one
pub fn feed_vehicles(feed: &Value) -> Option<&[Value]> {
    feed.get("vehicles").and_then(Value::as_array).map(Vec::as_slice)
}

pub fn rows_to_csv(rows: &[Vec<String>]) -> ExportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn leaderboard_csv(vehicles: &[Value]) -> ExportResult<String> {
    rows_to_csv(&leaderboard_rows(vehicles))
}

pub fn race_metadata_csv(feed: &Value) -> ExportResult<String> {
    rows_to_csv(&race_metadata_rows(feed))
}
