//! Bundle collector for Linux nodes.

mod path;
mod sources;

use super::{BundleCollector, BundleError, BundleParams, CollectContext, Filesystem, OsFs};
use chrono::Utc;
use nd_archive::{ArchiveWriter, BundleKind};
use serde::{Deserialize, Serialize};
use sources::{PodEnv, SourceCollector};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// A source that could not be collected, listed in `skipped.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSource {
    pub source: String,
    pub reason: String,
}

/// Collects node diagnostics into a ZIP archive written through `F`.
#[derive(Debug, Clone, Default)]
pub struct LinuxCollector<F: Filesystem = OsFs> {
    fs: F,
}

impl<F: Filesystem> LinuxCollector<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    fn collect(
        &self,
        ctx: &CollectContext,
        params: &BundleParams,
        kind: BundleKind,
        pod: Option<&PodEnv>,
    ) -> Result<PathBuf, BundleError> {
        ctx.check()?;
        let (hint, is_explicit) = params.output_hint();
        let output = self.determine_filepath(&self.fs, &hint, is_explicit)?;

        let mut writer = ArchiveWriter::new(sources::node_id())
            .with_kind(kind)
            .with_tool_version(env!("CARGO_PKG_VERSION"));
        writer.add_json("params.json", params)?;

        let mut collector = SourceCollector::new(ctx, &mut writer);
        if let Some(pod) = pod {
            collector.add_pod_info(pod)?;
        }
        if let Some(config) = &params.node_config {
            collector.add_node_config(config)?;
        }
        if let Some(logs_dir) = &params.logs_dir {
            collector.add_log_tails(logs_dir, params.logs_size_limit)?;
        }
        if let Some(data_dir) = &params.data_dir {
            collector.add_data_dir_listing(data_dir)?;
        }
        collector.add_system_snapshots()?;
        collector.add_text("collected-at.txt", Utc::now().to_rfc3339());
        let skipped = collector.into_skipped();

        if !skipped.is_empty() {
            writer.add_json("skipped.json", &skipped)?;
        }
        ctx.check()?;

        let file = self.fs.create_file(&output).map_err(|source| BundleError::NotWritable {
            path: output.clone(),
            source,
        })?;
        let written = writer.write_to(file).and_then(|(mut file, manifest)| {
            file.flush()?;
            Ok(manifest)
        });
        let manifest = match written {
            Ok(manifest) => manifest,
            Err(e) => {
                // no half-written archives
                let _ = self.fs.remove_file(&output);
                return Err(e.into());
            }
        };

        info!(
            path = %output.display(),
            kind = %kind,
            files = manifest.file_count(),
            bytes = manifest.total_bytes(),
            skipped = skipped.len(),
            "Debug bundle written"
        );
        Ok(output)
    }
}

impl<F: Filesystem> BundleCollector for LinuxCollector<F> {
    fn execute_bundle(&self, ctx: &CollectContext, params: &BundleParams) -> Result<PathBuf, BundleError> {
        self.collect(ctx, params, BundleKind::Local, None)
    }

    fn execute_k8s_bundle(&self, ctx: &CollectContext, params: &BundleParams) -> Result<PathBuf, BundleError> {
        let pod = PodEnv::from_vars(
            std::env::vars(),
            params.namespace.as_deref(),
            &params.label_selector,
        )
        .ok_or(BundleError::NotInCluster)?;
        self.collect(ctx, params, BundleKind::K8s, Some(&pod))
    }

    fn determine_filepath(
        &self,
        fs: &dyn Filesystem,
        path: &Path,
        is_explicit: bool,
    ) -> Result<PathBuf, BundleError> {
        path::resolve(fs, path, is_explicit, Utc::now().timestamp())
    }
}
