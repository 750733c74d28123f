//! Archive manifest types and serialization.
//!
//! The manifest is the source of truth for a bundle's contents:
//! - Archive metadata (version, timestamps, node identity, bundle kind)
//! - File listing with SHA-256 checksums

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Current archive schema version.
pub const ARCHIVE_SCHEMA_VERSION: &str = "1.0.0";

/// Manifest file name within the archive.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Which collection path produced the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleKind {
    /// Collected from the local node.
    #[default]
    Local,
    /// Collected from inside a pod of a k8s cluster.
    K8s,
}

impl std::fmt::Display for BundleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleKind::Local => write!(f, "local"),
            BundleKind::K8s => write!(f, "k8s"),
        }
    }
}

/// Archive manifest containing metadata and file checksums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveManifest {
    /// Archive format version.
    pub archive_version: String,

    /// When the archive was created.
    pub created_at: DateTime<Utc>,

    /// Identity of the node the data came from.
    pub node_id: String,

    pub kind: BundleKind,

    /// Operating system the collector ran on.
    pub os: String,

    /// Files included in the archive with checksums.
    pub files: Vec<FileEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,
}

impl ArchiveManifest {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            archive_version: ARCHIVE_SCHEMA_VERSION.to_string(),
            created_at: Utc::now(),
            node_id: node_id.into(),
            kind: BundleKind::Local,
            os: std::env::consts::OS.to_string(),
            files: Vec::new(),
            tool_version: None,
        }
    }

    pub fn with_kind(mut self, kind: BundleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = Some(version.into());
        self
    }

    pub fn add_file(&mut self, entry: FileEntry) {
        self.files.push(entry);
    }

    /// Total uncompressed size of all files in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn find_file(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Validate the manifest structure.
    pub fn validate(&self) -> crate::Result<()> {
        if self.archive_version != ARCHIVE_SCHEMA_VERSION {
            return Err(crate::ArchiveError::UnsupportedVersion {
                version: self.archive_version.clone(),
                supported: ARCHIVE_SCHEMA_VERSION.to_string(),
            });
        }

        if self.node_id.is_empty() {
            return Err(crate::ArchiveError::CorruptedManifest(
                "node_id is empty".to_string(),
            ));
        }

        for file in &self.files {
            if file.path.is_empty() {
                return Err(crate::ArchiveError::CorruptedManifest(
                    "file entry has empty path".to_string(),
                ));
            }
            if file.path == MANIFEST_FILE_NAME {
                return Err(crate::ArchiveError::CorruptedManifest(
                    "manifest lists itself".to_string(),
                ));
            }
            if file.sha256.len() != 64 {
                return Err(crate::ArchiveError::CorruptedManifest(format!(
                    "file '{}' has invalid checksum length",
                    file.path
                )));
            }
        }

        Ok(())
    }

    /// Sort files for deterministic ordering.
    pub fn sort_files(&mut self) {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// File entry in the manifest with checksum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path within the archive (relative).
    pub path: String,

    /// SHA-256 checksum (64 hex characters).
    pub sha256: String,

    pub bytes: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, sha256: impl Into<String>, bytes: u64) -> Self {
        Self {
            path: path.into(),
            sha256: sha256.into(),
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Compute SHA-256 checksum of data.
    pub fn compute_checksum(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    pub fn verify(&self, data: &[u8]) -> bool {
        Self::compute_checksum(data) == self.sha256
    }
}
