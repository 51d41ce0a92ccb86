//! Error types for the upload jobs

use thiserror::Error;

use crate::export::ExportError;

/// Result type alias for job operations
pub type JobResult<T> = Result<T, JobError>;

/// Upload job errors
///
/// Configuration errors abort the job before any I/O. Everything else is
/// logged where it happens and folded into the run's success flag.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    #[error("Error fetching live feed: {0}")]
    Fetch(String),

    #[error("{operation} failed: {message}")]
    Destination { operation: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] ExportError),
}

impl JobError {
    pub fn destination(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Destination {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error comes from setup rather than from a run
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Credentials(_))
    }
}
