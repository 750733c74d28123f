//! Error types for bundle collection.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the bundle-collection contract.
#[derive(Debug, Error)]
pub enum BundleError {
    /// No collector is linked for this operating system.
    #[error("{feature} is unsupported on your operating system")]
    UnsupportedPlatform { feature: &'static str },

    #[error("bundle collection was cancelled")]
    Cancelled,

    #[error("bundle collection exceeded its deadline")]
    DeadlineExceeded,

    #[error("invalid output path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("output file {0} already exists")]
    FileExists(PathBuf),

    #[error("cannot write to {path}: {source}")]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free default file name in {0}")]
    NoFreePath(PathBuf),

    #[error("invalid label selector '{0}': expected key=value[,key=value...]")]
    InvalidSelector(String),

    #[error("not running inside a k8s pod (KUBERNETES_SERVICE_HOST is not set)")]
    NotInCluster,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] nd_archive::ArchiveError),
}

impl BundleError {
    /// The gate's error for this feature.
    pub const fn unsupported() -> Self {
        BundleError::UnsupportedPlatform {
            feature: "debug bundle",
        }
    }

    /// Tell "feature unavailable here" apart from "feature failed here".
    pub fn is_unsupported_platform(&self) -> bool {
        matches!(self, BundleError::UnsupportedPlatform { .. })
    }
}
