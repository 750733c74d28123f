//! Archive reader for opening and verifying bundle ZIP files.

use crate::{ArchiveError, ArchiveManifest, FileEntry, Result, ARCHIVE_SCHEMA_VERSION, MANIFEST_FILE_NAME};
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Reader for bundle archives with checksum verification.
pub struct ArchiveReader<R: Read + Seek> {
    manifest: ArchiveManifest,
    archive: ZipArchive<R>,
}

impl ArchiveReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl ArchiveReader<Cursor<Vec<u8>>> {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Create a reader from any Read + Seek source.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let manifest = Self::read_manifest(&mut archive)?;
        manifest.validate()?;

        info!(
            node_id = %manifest.node_id,
            files = manifest.file_count(),
            kind = %manifest.kind,
            "Archive opened"
        );

        Ok(Self { manifest, archive })
    }

    fn read_manifest(archive: &mut ZipArchive<R>) -> Result<ArchiveManifest> {
        let mut manifest_file = archive
            .by_name(MANIFEST_FILE_NAME)
            .map_err(|_| ArchiveError::MissingFile(MANIFEST_FILE_NAME.to_string()))?;

        let mut json = String::new();
        manifest_file.read_to_string(&mut json)?;

        let manifest = ArchiveManifest::from_json(&json)?;
        if manifest.archive_version != ARCHIVE_SCHEMA_VERSION {
            warn!(
                archive_version = %manifest.archive_version,
                supported = %ARCHIVE_SCHEMA_VERSION,
                "Archive version mismatch"
            );
        }

        Ok(manifest)
    }

    pub fn manifest(&self) -> &ArchiveManifest {
        &self.manifest
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.manifest.files
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.manifest.find_file(path).is_some()
    }

    /// Read a file without checksum verification.
    pub fn read_raw(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| ArchiveError::FileNotFound(path.to_string()))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        debug!(path, bytes = data.len(), "Read file from archive (unverified)");
        Ok(data)
    }

    /// Read a file and check it against its manifest checksum.
    pub fn read_verified(&mut self, path: &str) -> Result<Vec<u8>> {
        let expected = self
            .manifest
            .find_file(path)
            .ok_or_else(|| ArchiveError::FileNotFound(path.to_string()))?
            .sha256
            .clone();

        let data = self.read_raw(path)?;
        let actual = FileEntry::compute_checksum(&data);
        if actual != expected {
            return Err(ArchiveError::ChecksumMismatch {
                path: path.to_string(),
                expected,
                actual,
            });
        }

        Ok(data)
    }

    /// Verify every file listed in the manifest.
    ///
    /// Returns the paths that failed verification.
    pub fn verify_all(&mut self) -> Vec<String> {
        let paths: Vec<String> = self.manifest.files.iter().map(|f| f.path.clone()).collect();
        let mut failures = Vec::new();

        for path in paths {
            if let Err(e) = self.read_verified(&path) {
                warn!(path = %path, error = %e, "Verification failed");
                failures.push(path);
            }
        }

        failures
    }

    /// Read and parse a verified JSON file.
    pub fn read_json<T: serde::de::DeserializeOwned>(&mut self, path: &str) -> Result<T> {
        let data = self.read_verified(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}
