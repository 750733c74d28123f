//! Archive writer for creating bundle ZIP files.

use crate::{ArchiveError, ArchiveManifest, BundleKind, FileEntry, Result, MANIFEST_FILE_NAME};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// File type hints for MIME type assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Json,
    Text,
    Log,
    Binary,
}

impl FileType {
    fn mime_type(&self) -> &'static str {
        match self {
            FileType::Json => "application/json",
            FileType::Text => "text/plain",
            FileType::Log => "text/x-log",
            FileType::Binary => "application/octet-stream",
        }
    }

    fn from_path(path: &str) -> Self {
        if path.ends_with(".json") {
            FileType::Json
        } else if path.ends_with(".log") {
            FileType::Log
        } else if path.ends_with(".txt")
            || path.ends_with(".yaml")
            || path.ends_with(".yml")
            || path.ends_with(".toml")
        {
            FileType::Text
        } else {
            FileType::Binary
        }
    }
}

/// Builder for bundle archives.
///
/// Entries are buffered in memory and written in path order, after the
/// manifest, when the archive is finalized.
pub struct ArchiveWriter {
    manifest: ArchiveManifest,
    files: Vec<(String, Vec<u8>)>,
}

impl ArchiveWriter {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            manifest: ArchiveManifest::new(node_id),
            files: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: BundleKind) -> Self {
        self.manifest = self.manifest.with_kind(kind);
        self
    }

    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.manifest = self.manifest.with_tool_version(version);
        self
    }

    /// Add a file with automatic checksum. A later entry with the same path
    /// replaces the earlier one.
    pub fn add_file(&mut self, path: impl Into<String>, data: Vec<u8>, file_type: Option<FileType>) {
        let path = path.into();
        let checksum = FileEntry::compute_checksum(&data);
        let bytes = data.len() as u64;
        let file_type = file_type.unwrap_or_else(|| FileType::from_path(&path));

        self.manifest.files.retain(|f| f.path != path);
        self.files.retain(|(p, _)| *p != path);

        let entry = FileEntry::new(&path, checksum, bytes).with_mime_type(file_type.mime_type());
        self.manifest.add_file(entry);

        debug!(path = %path, bytes, "Added file to archive");
        self.files.push((path, data));
    }

    /// Add a JSON-serializable value as a file.
    pub fn add_json<T: serde::Serialize>(&mut self, path: impl Into<String>, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.add_file(path, json.into_bytes(), Some(FileType::Json));
        Ok(())
    }

    /// Add a log tail under `logs/`.
    pub fn add_log(&mut self, name: &str, data: Vec<u8>) {
        self.add_file(format!("logs/{}", name), data, Some(FileType::Log));
    }

    pub fn manifest(&self) -> &ArchiveManifest {
        &self.manifest
    }

    /// Total size in bytes before compression.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|(_, data)| data.len() as u64).sum()
    }

    /// File count, not including the manifest.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Write the archive to a file.
    pub fn write(self, path: &Path) -> Result<ArchiveManifest> {
        let file = std::fs::File::create(path)?;
        let (file, manifest) = self.finish_into(file)?;
        file.sync_all()?;

        info!(
            path = %path.display(),
            files = manifest.file_count(),
            bytes = manifest.total_bytes(),
            kind = %manifest.kind,
            "Archive written"
        );

        Ok(manifest)
    }

    /// Write the archive into any writer, e.g. one handed out by a
    /// filesystem abstraction.
    pub fn write_to<W: Write + Seek>(self, sink: W) -> Result<(W, ArchiveManifest)> {
        self.finish_into(sink)
    }

    /// Write the archive to a byte vector.
    pub fn write_to_vec(self) -> Result<(Vec<u8>, ArchiveManifest)> {
        let (cursor, manifest) = self.finish_into(Cursor::new(Vec::new()))?;
        let bytes = cursor.into_inner();

        info!(
            files = manifest.file_count(),
            compressed_bytes = bytes.len(),
            uncompressed_bytes = manifest.total_bytes(),
            "Archive written to memory"
        );

        Ok((bytes, manifest))
    }

    fn finish_into<W: Write + Seek>(mut self, sink: W) -> Result<(W, ArchiveManifest)> {
        if self.files.is_empty() {
            return Err(ArchiveError::EmptyArchive);
        }

        self.manifest.sort_files();
        self.files.sort_by(|a, b| a.0.cmp(&b.0));

        let manifest_json = self.manifest.to_json()?;

        let mut zip = ZipWriter::new(sink);
        let options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        // Manifest first so readers can stream it without seeking
        zip.start_file(MANIFEST_FILE_NAME, options)?;
        zip.write_all(manifest_json.as_bytes())?;

        for (file_path, data) in &self.files {
            zip.start_file(file_path.as_str(), options)?;
            zip.write_all(data)?;
        }

        let sink = zip.finish()?;
        Ok((sink, self.manifest))
    }
}
