//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ghreport operations
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration rejected by validation; carries every problem found
    #[error("Configuration error: {}", .0.join("; "))]
    Config(Vec<String>),

    /// The data source executable could not be located
    #[error("{0}")]
    SourceUnavailable(String),

    /// The data source ran but reported failure
    #[error("Data source command failed: {command}: {stderr}")]
    SourceCommand { command: String, stderr: String },

    /// The data source answered with something that is not the expected JSON
    #[error("Malformed data source response: {0}")]
    SourceResponse(String),

    /// A persisted snapshot could not be decoded
    #[error("Corrupt snapshot {}: {source}", path.display())]
    CorruptSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A snapshot for the same second already exists
    #[error("Snapshot already exists: {}", .0.display())]
    SnapshotExists(PathBuf),

    /// A date-range bound that is neither YYYY-MM-DD nor RFC 3339
    #[error("Invalid date bound '{0}': expected YYYY-MM-DD or RFC 3339")]
    DateRange(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Snapshot glob pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    pub fn source_command(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::SourceCommand {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    pub fn corrupt_snapshot(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::CorruptSnapshot {
            path: path.into(),
            source,
        }
    }

    /// Failures that happened at the data source boundary, before any record
    /// reached the parser.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable(_) | Self::SourceCommand { .. } | Self::SourceResponse(_)
        )
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
