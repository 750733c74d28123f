//! Diagnostic bundle archive writer/reader for nodediag.
//!
//! A bundle is a ZIP archive holding everything collected from a node for
//! offline troubleshooting, plus a manifest that lists every entry with its
//! SHA-256 checksum.
//!
//! # Archive Layout
//!
//! - `manifest.json`: metadata and file listing with checksums (always first)
//! - `params.json`: the collection parameters (secrets redacted)
//! - `config/`: node configuration files
//! - `logs/`: log file tails
//! - `proc/`: kernel and OS snapshots
//! - `k8s/`: pod environment (k8s bundles only)
//!
//! # Example
//!
//! ```no_run
//! use nd_archive::{ArchiveReader, ArchiveWriter};
//! use std::path::Path;
//!
//! let mut writer = ArchiveWriter::new("node-abc").with_tool_version("0.1.0");
//! writer.add_json("params.json", &serde_json::json!({"timeout_secs": 30})).unwrap();
//! writer.write(Path::new("1700000000-bundle.zip")).unwrap();
//!
//! let mut reader = ArchiveReader::open(Path::new("1700000000-bundle.zip")).unwrap();
//! assert!(reader.verify_all().is_empty());
//! ```

pub mod error;
pub mod manifest;
pub mod reader;
pub mod writer;

pub use error::{ArchiveError, Result};
pub use manifest::{ArchiveManifest, BundleKind, FileEntry, ARCHIVE_SCHEMA_VERSION, MANIFEST_FILE_NAME};
pub use reader::ArchiveReader;
pub use writer::{ArchiveWriter, FileType};
