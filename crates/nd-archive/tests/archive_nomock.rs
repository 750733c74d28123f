//! No-mock archive integration tests.
//!
//! Writes real archives to disk and reads them back:
//! - Checksums in the manifest verify on read-back
//! - Tampered entries are detected
//! - Manifest metadata survives the round trip

use nd_archive::{ArchiveError, ArchiveReader, ArchiveWriter, BundleKind, ARCHIVE_SCHEMA_VERSION};
use serde_json::json;
use std::io::Write;
use tempfile::TempDir;
use zip::write::{FileOptions, ZipWriter};

fn build_node_archive(kind: BundleKind) -> ArchiveWriter {
    let mut writer = ArchiveWriter::new("node-test")
        .with_kind(kind)
        .with_tool_version("0.1.0-test");

    writer
        .add_json(
            "params.json",
            &json!({"logs_size_limit": 1024, "timeout_secs": 30}),
        )
        .expect("add params");
    writer.add_file("config/node.yaml", b"node_id: 1\n".to_vec(), None);
    writer.add_log("node.log", b"INFO starting\nINFO ready\n".to_vec());
    writer.add_file("proc/loadavg", b"0.10 0.20 0.30 1/100 42\n".to_vec(), None);
    writer
}

#[test]
fn test_archive_written_to_disk_verifies() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("1700000000-bundle.zip");

    let written = build_node_archive(BundleKind::Local).write(&path).expect("write");

    let mut reader = ArchiveReader::open(&path).expect("open");
    assert_eq!(reader.manifest().archive_version, ARCHIVE_SCHEMA_VERSION);
    assert_eq!(reader.manifest().file_count(), written.file_count());
    assert_eq!(reader.manifest().kind, BundleKind::Local);

    let failures = reader.verify_all();
    assert!(failures.is_empty(), "verification failures: {:?}", failures);

    for entry in written.files.iter() {
        let data = reader.read_verified(&entry.path).expect("read entry");
        assert_eq!(data.len() as u64, entry.bytes, "size mismatch for {}", entry.path);
    }
}

#[test]
fn test_k8s_kind_survives_round_trip() {
    let (bytes, _) = build_node_archive(BundleKind::K8s).write_to_vec().unwrap();
    let reader = ArchiveReader::from_bytes(bytes).unwrap();
    assert_eq!(reader.manifest().kind, BundleKind::K8s);
    assert_eq!(reader.manifest().tool_version.as_deref(), Some("0.1.0-test"));
}

#[test]
fn test_tampered_entry_is_detected() {
    // Reuse a valid manifest but pair it with altered content.
    let (bytes, manifest) = build_node_archive(BundleKind::Local).write_to_vec().unwrap();
    let mut original = ArchiveReader::from_bytes(bytes).unwrap();
    let manifest_json = manifest.to_json().unwrap();

    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options: FileOptions<'_, ()> = FileOptions::default();
        zip.start_file("manifest.json", options).unwrap();
        zip.write_all(manifest_json.as_bytes()).unwrap();
        for entry in &manifest.files {
            let mut data = original.read_raw(&entry.path).unwrap();
            if entry.path == "logs/node.log" {
                data.extend_from_slice(b"INFO injected\n");
            }
            zip.start_file(entry.path.as_str(), options).unwrap();
            zip.write_all(&data).unwrap();
        }
        zip.finish().unwrap();
    }

    let mut tampered = ArchiveReader::from_bytes(buffer.into_inner()).unwrap();
    assert_eq!(tampered.verify_all(), vec!["logs/node.log".to_string()]);
    assert!(matches!(
        tampered.read_verified("logs/node.log"),
        Err(ArchiveError::ChecksumMismatch { .. })
    ));
}

#[test]
fn test_archive_without_manifest_is_rejected() {
    let mut buffer = std::io::Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options: FileOptions<'_, ()> = FileOptions::default();
        zip.start_file("params.json", options).unwrap();
        zip.write_all(b"{}").unwrap();
        zip.finish().unwrap();
    }

    let result = ArchiveReader::from_bytes(buffer.into_inner());
    assert!(matches!(result, Err(ArchiveError::MissingFile(_))));
}
