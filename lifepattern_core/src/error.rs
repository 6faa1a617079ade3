//! Error types for the lifepattern_core library.

use chrono::NaiveDate;
use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lifepattern_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The subject has no daily logs to analyse
    #[error("No daily logs found for '{subject}'. Please create a log first.")]
    NoDataAvailable { subject: String },

    /// Neither an explicit start/end pair nor a positive day count was given
    #[error("Please provide either 'days' or both 'start' and 'end' dates")]
    InvalidRangeSpecification,

    /// No assessment has been computed for the subject yet
    #[error("No analysis found for '{subject}'. Please create a daily log first.")]
    NoAssessment { subject: String },

    /// Daily log lookup by id failed
    #[error("Daily log not found with id: {id}")]
    LogNotFound { id: Uuid },

    /// A log already exists for the subject on this date
    #[error("A log already exists for {date}")]
    DuplicateDate { date: NaiveDate },

    /// Input metrics failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The log book on disk could not be used
    #[error("Store error: {0}")]
    Store(String),
}

impl Error {
    /// Whether the caller caused this error (bad input or missing data)
    /// rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::NoDataAvailable { .. }
                | Error::InvalidRangeSpecification
                | Error::NoAssessment { .. }
                | Error::LogNotFound { .. }
                | Error::DuplicateDate { .. }
                | Error::Validation(_)
        )
    }
}
