//! Fallback for platforms without a bundle collector.
//!
//! Every operation fails with [`BundleError::UnsupportedPlatform`] before
//! reading its arguments: no context check, no path probe, no file created.

use super::{BundleCollector, BundleError, BundleParams, CollectContext, Filesystem};
use std::path::{Path, PathBuf};

/// Collector that reports the feature as unavailable on this platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl BundleCollector for Unsupported {
    fn execute_bundle(&self, _ctx: &CollectContext, _params: &BundleParams) -> Result<PathBuf, BundleError> {
        Err(BundleError::unsupported())
    }

    fn execute_k8s_bundle(&self, _ctx: &CollectContext, _params: &BundleParams) -> Result<PathBuf, BundleError> {
        Err(BundleError::unsupported())
    }

    fn determine_filepath(
        &self,
        _fs: &dyn Filesystem,
        _path: &Path,
        _is_explicit: bool,
    ) -> Result<PathBuf, BundleError> {
        Err(BundleError::unsupported())
    }
}
