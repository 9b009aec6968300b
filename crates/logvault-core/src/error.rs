//! Error types for logvault.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for logvault operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for logvault.
///
/// Every failure is fatal to the run that raised it: the pipeline halts at
/// the first failing step and surfaces the error to the operator through the
/// process exit status.
#[derive(Error, Debug)]
pub enum Error {
    /// An explicit date did not match the `YYYY.mm.dd` pattern
    #[error("invalid date format: {0:?} (expected YYYY.mm.dd)")]
    InvalidDateFormat(String),

    /// Missing or malformed arguments
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The per-index subdirectory is absent from the local data directory
    #[error("index directory not found: {0}")]
    IndexNotFound(PathBuf),

    /// The engine's mapping query could not be completed
    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(String),

    /// The compression step failed
    #[error("archive failed: {0}")]
    ArchiveFailed(String),

    /// The transfer tool exited non-zero
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// An expected remote artifact is absent after download
    #[error("artifact missing: {0}")]
    ArtifactMissing(String),

    /// The synthesized restore procedure exited non-zero
    #[error("restore script exited with status {0}")]
    RestoreFailed(i32),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
