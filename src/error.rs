//! Error types for spending-lens

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Server returned {status} for {path}")]
    Http { status: u16, path: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Unsupported import format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single input row never became a `Transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// A required field was absent or blank
    MissingField(&'static str),
    /// Date present but not an ISO-8601 calendar date
    InvalidDate(String),
    /// Amount present but not a number
    InvalidAmount(String),
    /// Row shape unusable (too few columns, not an object, ...)
    MalformedRow(String),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::MissingField(field) => write!(f, "missing {}", field),
            RowRejection::InvalidDate(raw) => write!(f, "invalid date '{}'", raw),
            RowRejection::InvalidAmount(raw) => write!(f, "invalid amount '{}'", raw),
            RowRejection::MalformedRow(why) => write!(f, "malformed row: {}", why),
        }
    }
}

impl std::error::Error for RowRejection {}
