//! Error types for weighttable
//!
//! The table itself reports failures through sentinel values (`false`,
//! `None`, `0.0`). [`AddError`] carries the reason behind a rejected add for
//! callers that want it; [`AppError`] covers configuration loading and the
//! command-line surface.

use thiserror::Error;

/// Reason an add was rejected. A rejected add never mutates the table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddError {
    #[error("key must not be empty")]
    EmptyKey,

    #[error("weight must be positive, got {0}")]
    NonPositiveWeight(i64),

    #[error("new key '{0}' requires a value")]
    MissingValue(String),

    #[error("adding weight {weight} to '{key}' would overflow the total weight")]
    WeightOverflow { key: String, weight: i64 },
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Entry '{key}' rejected by table: {source}")]
    InvalidEntry {
        key: String,
        #[source]
        source: AddError,
    },

    #[error("Failed to write output: {0}")]
    Output(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
