//! Common error types for the WFH selection service

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for WFH operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the ledger, store, export and admin components
#[derive(Error, Debug)]
pub enum Error {
    /// Name not on the roster, unknown export format, or other bad request data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Day value other than Thursday or Friday
    #[error("Invalid day: {0:?} (expected Thursday or Friday)")]
    InvalidDay(String),

    /// A selection already exists for this person and week
    #[error("{name} has already selected a day for week {week_id}")]
    Duplicate { name: String, week_id: String },

    /// Admin secret mismatch
    #[error("Authentication failed: admin secret does not match")]
    Auth,

    /// Durable table exists but cannot be parsed
    #[error("Selection store {path} is corrupt: {reason}")]
    StoreCorrupt { path: PathBuf, reason: String },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error while writing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet packaging error
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Export(err.to_string())
    }
}
