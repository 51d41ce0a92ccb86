//! Tabular exports of the live feed
//!
//! The upload jobs treat the feed as an opaque JSON document, so the builders
//! here read it through [`FieldValue`] and never fail on a missing key.

mod manifest;
mod tables;

pub use manifest::*;
pub use tables::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
