//! Output path resolution for the Linux collector.

use crate::debug_bundle::{BundleError, Filesystem};
use std::path::{Path, PathBuf};

/// Required extension for bundle archives.
const BUNDLE_EXTENSION: &str = "zip";

/// Attempts at a collision-free default name before giving up.
const MAX_DEFAULT_ATTEMPTS: u32 = 100;

/// Resolve the output path.
///
/// An explicit path is used as given once it checks out: `.zip` extension,
/// not already present, parent directory exists and is writable. Otherwise a
/// `<unix-seconds>-bundle.zip` name in the current directory is chosen,
/// suffixed `-1`, `-2`, ... on collision.
pub(crate) fn resolve(
    fs: &dyn Filesystem,
    path: &Path,
    is_explicit: bool,
    now_unix: i64,
) -> Result<PathBuf, BundleError> {
    if is_explicit {
        resolve_explicit(fs, path)
    } else {
        resolve_default(fs, now_unix)
    }
}

fn resolve_explicit(fs: &dyn Filesystem, path: &Path) -> Result<PathBuf, BundleError> {
    if path.as_os_str().is_empty() {
        return Err(invalid(path, "path is empty"));
    }
    if path.extension().and_then(|e| e.to_str()) != Some(BUNDLE_EXTENSION) {
        return Err(invalid(path, "extension must be .zip"));
    }
    if fs.exists(path) {
        return Err(BundleError::FileExists(path.to_path_buf()));
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => fs.current_dir()?,
    };
    if !fs.is_dir(&parent) {
        return Err(invalid(path, "parent directory does not exist"));
    }

    probe_writable(fs, &parent)?;
    Ok(path.to_path_buf())
}

fn resolve_default(fs: &dyn Filesystem, now_unix: i64) -> Result<PathBuf, BundleError> {
    let dir = fs.current_dir()?;

    for attempt in 0..MAX_DEFAULT_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{}-bundle.{}", now_unix, BUNDLE_EXTENSION)
        } else {
            format!("{}-bundle-{}.{}", now_unix, attempt, BUNDLE_EXTENSION)
        };
        let candidate = dir.join(name);
        if !fs.exists(&candidate) {
            probe_writable(fs, &dir)?;
            return Ok(candidate);
        }
    }

    Err(BundleError::NoFreePath(dir))
}

/// Create and remove a scratch file to confirm `dir` accepts writes.
fn probe_writable(fs: &dyn Filesystem, dir: &Path) -> Result<(), BundleError> {
    let probe = dir.join(format!(".ndctl-write-probe-{}", std::process::id()));
    let not_writable = |source| BundleError::NotWritable {
        path: dir.to_path_buf(),
        source,
    };

    drop(fs.create_file(&probe).map_err(not_writable)?);
    fs.remove_file(&probe).map_err(not_writable)
}

fn invalid(path: &Path, reason: &str) -> BundleError {
    BundleError::InvalidPath {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
