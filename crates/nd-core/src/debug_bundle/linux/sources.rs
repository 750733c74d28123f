//! Local artifact sources for the Linux collector.
//!
//! Each source adds entries to the archive. A source that cannot be read is
//! recorded as skipped rather than failing the whole bundle.

use super::SkippedSource;
use crate::debug_bundle::{BundleError, CollectContext};
use nd_archive::{ArchiveWriter, FileType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Kernel and OS snapshots copied verbatim into `proc/`.
pub(crate) const SYSTEM_SNAPSHOTS: &[(&str, &str)] = &[
    ("/proc/cpuinfo", "proc/cpuinfo"),
    ("/proc/meminfo", "proc/meminfo"),
    ("/proc/loadavg", "proc/loadavg"),
    ("/proc/uptime", "proc/uptime"),
    ("/proc/version", "proc/version"),
    ("/proc/mounts", "proc/mounts"),
    ("/etc/os-release", "proc/os-release"),
];

/// Deepest level walked below the data directory.
const DATA_DIR_MAX_DEPTH: usize = 4;

/// Cap on listed data-directory entries.
const DATA_DIR_MAX_ENTRIES: usize = 10_000;

const SERVICE_ACCOUNT_NAMESPACE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Collects artifacts into an archive, tracking what had to be skipped.
pub(crate) struct SourceCollector<'a> {
    ctx: &'a CollectContext,
    writer: &'a mut ArchiveWriter,
    skipped: Vec<SkippedSource>,
}

impl<'a> SourceCollector<'a> {
    pub(crate) fn new(ctx: &'a CollectContext, writer: &'a mut ArchiveWriter) -> Self {
        Self {
            ctx,
            writer,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn into_skipped(self) -> Vec<SkippedSource> {
        self.skipped
    }

    fn skip(&mut self, source: &Path, reason: impl ToString) {
        let reason = reason.to_string();
        warn!(source = %source.display(), reason = %reason, "Skipping bundle source");
        self.skipped.push(SkippedSource {
            source: source.display().to_string(),
            reason,
        });
    }

    /// Copy one file into the archive under `archive_path`.
    pub(crate) fn add_file(&mut self, source: &Path, archive_path: &str) -> Result<(), BundleError> {
        self.ctx.check()?;
        match fs::read(source) {
            Ok(data) => {
                debug!(source = %source.display(), bytes = data.len(), "Collected file");
                self.writer.add_file(archive_path, data, None);
            }
            Err(e) => self.skip(source, e),
        }
        Ok(())
    }

    pub(crate) fn add_system_snapshots(&mut self) -> Result<(), BundleError> {
        for (source, archive_path) in SYSTEM_SNAPSHOTS {
            self.add_file(Path::new(source), archive_path)?;
        }
        Ok(())
    }

    pub(crate) fn add_node_config(&mut self, path: &Path) -> Result<(), BundleError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "node-config".to_string());
        self.add_file(path, &format!("config/{}", name))
    }

    /// Tail every `*.log` file in `dir`, in name order, within `limit` bytes
    /// in total.
    pub(crate) fn add_log_tails(&mut self, dir: &Path, limit: u64) -> Result<(), BundleError> {
        let mut logs = match list_log_files(dir) {
            Ok(logs) => logs,
            Err(e) => {
                self.skip(dir, e);
                return Ok(());
            }
        };
        logs.sort();

        let mut remaining = limit;
        for log in logs {
            self.ctx.check()?;
            if remaining == 0 {
                self.skip(&log, "logs size limit reached");
                continue;
            }
            match read_tail(&log, remaining) {
                Ok(data) => {
                    remaining -= data.len() as u64;
                    let name = log
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    debug!(source = %log.display(), bytes = data.len(), "Collected log tail");
                    self.writer.add_log(&name, data);
                }
                Err(e) => self.skip(&log, e),
            }
        }
        Ok(())
    }

    /// Record names and sizes under the data directory as `data-dir.json`.
    pub(crate) fn add_data_dir_listing(&mut self, dir: &Path) -> Result<(), BundleError> {
        self.ctx.check()?;
        if !dir.is_dir() {
            self.skip(dir, "not a directory");
            return Ok(());
        }

        let mut entries = Vec::new();
        let truncated = walk_dir(dir, dir, 0, DATA_DIR_MAX_ENTRIES, &mut entries);

        let listing = DataDirListing {
            root: dir.to_path_buf(),
            truncated,
            entries,
        };
        self.writer.add_json("data-dir.json", &listing)?;
        Ok(())
    }

    pub(crate) fn add_pod_info(&mut self, pod: &PodEnv) -> Result<(), BundleError> {
        self.ctx.check()?;
        self.writer.add_json("k8s/pod.json", pod)?;
        Ok(())
    }

    pub(crate) fn add_text(&mut self, archive_path: &str, text: String) {
        self.writer.add_file(archive_path, text.into_bytes(), Some(FileType::Text));
    }
}

fn list_log_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "log") {
            logs.push(path);
        }
    }
    Ok(logs)
}

/// Read at most the last `max_bytes` of a file.
fn read_tail(path: &Path, max_bytes: u64) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let start = len.saturating_sub(max_bytes);
    file.seek(SeekFrom::Start(start))?;

    let mut data = Vec::new();
    file.take(max_bytes).read_to_end(&mut data)?;
    Ok(data)
}

#[derive(Debug, Serialize)]
struct DataDirListing {
    root: PathBuf,
    truncated: bool,
    entries: Vec<DataDirEntry>,
}

#[derive(Debug, Serialize)]
struct DataDirEntry {
    path: String,
    bytes: u64,
    is_dir: bool,
}

/// List `dir` depth-first into `out`, at most `limit` entries.
///
/// Returns `true` when an entry had to be left out.
fn walk_dir(root: &Path, dir: &Path, depth: usize, limit: usize, out: &mut Vec<DataDirEntry>) -> bool {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return false;
    };
    let mut children: Vec<PathBuf> = read_dir.filter_map(|e| e.ok().map(|e| e.path())).collect();
    children.sort();

    for child in children {
        // symlink_metadata so links are listed, not followed
        let Ok(meta) = fs::symlink_metadata(&child) else {
            continue;
        };
        if out.len() >= limit {
            return true;
        }
        let relative = child.strip_prefix(root).unwrap_or(&child);
        out.push(DataDirEntry {
            path: relative.display().to_string(),
            bytes: meta.len(),
            is_dir: meta.is_dir(),
        });
        if meta.is_dir()
            && depth + 1 < DATA_DIR_MAX_DEPTH
            && walk_dir(root, &child, depth + 1, limit, out)
        {
            return true;
        }
    }
    false
}

/// What a pod can learn about itself without calling the API server.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PodEnv {
    pub namespace: String,
    pub hostname: Option<String>,
    pub label_selector: BTreeMap<String, String>,
    pub kubernetes_env: BTreeMap<String, String>,
}

impl PodEnv {
    /// Build from process environment variables; `None` outside a pod.
    pub(crate) fn from_vars<I>(
        vars: I,
        namespace: Option<&str>,
        label_selector: &BTreeMap<String, String>,
    ) -> Option<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let kubernetes_env: BTreeMap<String, String> = vars
            .into_iter()
            .filter(|(k, _)| k.starts_with("KUBERNETES_"))
            .collect();
        if !kubernetes_env.contains_key("KUBERNETES_SERVICE_HOST") {
            return None;
        }

        let namespace = namespace
            .map(str::to_string)
            .or_else(|| {
                fs::read_to_string(SERVICE_ACCOUNT_NAMESPACE)
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| "default".to_string());

        Some(Self {
            namespace,
            hostname: hostname(),
            label_selector: label_selector.clone(),
            kubernetes_env,
        })
    }
}

fn hostname() -> Option<String> {
    fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Stable node identifier: machine-id prefix, else hostname.
pub(crate) fn node_id() -> String {
    let machine_id = fs::read_to_string("/etc/machine-id").ok();
    node_id_from(machine_id.as_deref(), hostname())
}

fn node_id_from(machine_id: Option<&str>, hostname: Option<String>) -> String {
    if let Some(prefix) = machine_id.and_then(|id| id.trim().get(..8)) {
        return format!("node-{}", prefix);
    }
    match hostname {
        Some(name) => format!("node-{}", name),
        None => "node-unknown".to_string(),
    }
}
