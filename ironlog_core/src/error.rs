//! Error types for the ironlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ironlog_core operations
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

    /// Badge catalog validation error
    #[error("Badge catalog error: {0}")]
    BadgeCatalog(String),

    /// Store error (missing record, bad argument)
    #[error("Store error: {0}")]
    Store(String),

    /// Backup/restore interchange error
    #[error("Backup error: {0}")]
    Backup(String),

    /// Text generation failed (caller falls back to static text)
    #[error("Coach error: {0}")]
    Coach(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
