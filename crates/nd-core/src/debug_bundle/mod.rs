//! Diagnostic bundle collection.
//!
//! `ndctl debug bundle` gathers logs, configuration and runtime state from
//! the running node into one archive. The work sits behind the
//! [`BundleCollector`] contract, and exactly one implementation of it is
//! linked into a build:
//!
//! - Linux: [`LinuxCollector`], which collects from the local node or, for
//!   the k8s variant, from inside a pod.
//! - Every other target, or any target built with the `gate-only` feature:
//!   [`Unsupported`], which fails every operation with
//!   [`BundleError::UnsupportedPlatform`] before touching anything.
//!
//! Callers use the free functions [`execute_bundle`], [`execute_k8s_bundle`]
//! and [`determine_filepath`], which forward to [`ActiveCollector`]. The
//! choice is made by `cfg` at compile time; there is no runtime branch.

mod context;
mod error;
mod fs;
mod params;
mod unsupported;

#[cfg(all(target_os = "linux", not(feature = "gate-only")))]
mod linux;

pub use context::CollectContext;
pub use error::BundleError;
pub use fs::{Filesystem, OsFs, WriteSeek};
pub use params::{
    parse_label_selector, BundleParams, Credentials, DEFAULT_LOGS_SIZE_LIMIT, DEFAULT_TIMEOUT_SECS,
};
pub use unsupported::Unsupported;

#[cfg(all(target_os = "linux", not(feature = "gate-only")))]
pub use linux::{LinuxCollector, SkippedSource};

use std::path::{Path, PathBuf};

/// The bundle-collection contract.
///
/// Every platform variant implements the same three operations, so the CLI
/// is written once against this trait.
pub trait BundleCollector {
    /// Collect a bundle from the local node and return the archive path.
    fn execute_bundle(&self, ctx: &CollectContext, params: &BundleParams) -> Result<PathBuf, BundleError>;

    /// Collect a bundle from inside a k8s pod and return the archive path.
    fn execute_k8s_bundle(&self, ctx: &CollectContext, params: &BundleParams) -> Result<PathBuf, BundleError>;

    /// Resolve where the archive should be written.
    ///
    /// `is_explicit` tells whether the caller supplied `path` itself (a flag)
    /// or it is a default. An error never carries a partially resolved path.
    fn determine_filepath(
        &self,
        fs: &dyn Filesystem,
        path: &Path,
        is_explicit: bool,
    ) -> Result<PathBuf, BundleError>;
}

/// The collector linked into this build.
#[cfg(all(target_os = "linux", not(feature = "gate-only")))]
pub type ActiveCollector = LinuxCollector<OsFs>;

/// The collector linked into this build.
#[cfg(any(not(target_os = "linux"), feature = "gate-only"))]
pub type ActiveCollector = Unsupported;

/// Whether this build links a working collector.
pub const fn is_supported() -> bool {
    cfg!(all(target_os = "linux", not(feature = "gate-only")))
}

/// Construct the collector linked into this build.
pub fn active_collector() -> ActiveCollector {
    ActiveCollector::default()
}

/// Collect a local-node bundle with the active collector.
pub fn execute_bundle(ctx: &CollectContext, params: &BundleParams) -> Result<PathBuf, BundleError> {
    active_collector().execute_bundle(ctx, params)
}

/// Collect a k8s bundle with the active collector.
pub fn execute_k8s_bundle(ctx: &CollectContext, params: &BundleParams) -> Result<PathBuf, BundleError> {
    active_collector().execute_k8s_bundle(ctx, params)
}

/// Resolve the archive path with the active collector.
pub fn determine_filepath(fs: &dyn Filesystem, path: &Path, is_explicit: bool) -> Result<PathBuf, BundleError> {
    active_collector().determine_filepath(fs, path, is_explicit)
}
