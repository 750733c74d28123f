//! Error types for archive operations.

use thiserror::Error;

/// Errors that can occur while writing or reading a bundle archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Checksum verification failed
    #[error("checksum mismatch for '{path}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("unsupported archive version: {version} (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },

    #[error("corrupted manifest: {0}")]
    CorruptedManifest(String),

    #[error("file not found in archive: {0}")]
    FileNotFound(String),

    /// Nothing was added before `write`
    #[error("archive has no content to write")]
    EmptyArchive,
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;
