//! Error types for chainpulse-core

use thiserror::Error;

/// Main error type for the chainpulse-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A raw row is missing a required field or holds an unparseable value.
    ///
    /// This is a hard error: the transformation that hit it is aborted.
    /// It is distinct from "no data", which is a valid, common state.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Settings store error
    #[error("settings error: {0}")]
    Settings(String),
}

/// Result type alias for chainpulse-core
pub type Result<T> = std::result::Result<T, Error>;
