//! Bundle configuration loading.
//!
//! Resolution order for the config file:
//! 1. `--config <path>` (must exist)
//! 2. `$ND_CONFIG_DIR/bundle.toml`
//! 3. `<XDG config dir>/nodediag/bundle.toml`
//!
//! A missing file at steps 2-3 falls back to built-in defaults. Values from
//! the file only fill in what the command line left unset.

use crate::debug_bundle::{BundleParams, DEFAULT_LOGS_SIZE_LIMIT, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default XDG config directory name.
const CONFIG_DIR_NAME: &str = "nodediag";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "bundle.toml";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "ND_CONFIG_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid TOML in config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Contents of `bundle.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    pub node_config: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub logs_size_limit: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub namespace: Option<String>,
    pub label_selector: BTreeMap<String, String>,
}

impl BundleConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill fields of `params` the command line left unset.
    ///
    /// `params` numeric fields count as unset when `explicit_*` is false.
    pub fn apply(
        &self,
        mut params: BundleParams,
        explicit_logs_size_limit: bool,
        explicit_timeout: bool,
    ) -> BundleParams {
        params.node_config = params.node_config.or_else(|| self.node_config.clone());
        params.logs_dir = params.logs_dir.or_else(|| self.logs_dir.clone());
        params.data_dir = params.data_dir.or_else(|| self.data_dir.clone());
        params.namespace = params.namespace.or_else(|| self.namespace.clone());
        if params.label_selector.is_empty() {
            params.label_selector = self.label_selector.clone();
        }
        if !explicit_logs_size_limit {
            params.logs_size_limit = self.logs_size_limit.unwrap_or(DEFAULT_LOGS_SIZE_LIMIT);
        }
        if !explicit_timeout {
            params.timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        }
        params
    }
}

/// Locate the config file, without checking that it exists.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join(CONFIG_FILE_NAME));
    }
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the bundle configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<BundleConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(BundleConfig::default()),
        },
    };

    if !path.exists() {
        if required {
            return Err(ConfigError::NotFound { path });
        }
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(BundleConfig::default());
    }

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let config = BundleConfig::from_toml(&text, &path)?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let text = r#"
            node_config = "/etc/nodediag/node.yaml"
            logs_dir = "/var/log/nodediag"
            logs_size_limit = 1048576
            timeout_secs = 10
            namespace = "brokers"

            [label_selector]
            app = "broker"
        "#;
        let config = BundleConfig::from_toml(text, Path::new("bundle.toml")).unwrap();

        assert_eq!(config.logs_dir, Some(PathBuf::from("/var/log/nodediag")));
        assert_eq!(config.logs_size_limit, Some(1_048_576));
        assert_eq!(config.label_selector.get("app").map(String::as_str), Some("broker"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = BundleConfig::from_toml("colour = \"blue\"", Path::new("bundle.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_cli_values_win() {
        let config = BundleConfig {
            logs_dir: Some(PathBuf::from("/from/config")),
            namespace: Some("config-ns".to_string()),
            timeout_secs: Some(5),
            logs_size_limit: Some(10),
            ..Default::default()
        };
        let params = BundleParams {
            logs_dir: Some(PathBuf::from("/from/cli")),
            timeout_secs: 99,
            ..Default::default()
        };

        let merged = config.apply(params, false, true);

        assert_eq!(merged.logs_dir, Some(PathBuf::from("/from/cli")));
        assert_eq!(merged.namespace.as_deref(), Some("config-ns"));
        assert_eq!(merged.timeout_secs, 99);
        assert_eq!(merged.logs_size_limit, 10);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.toml");
        std::fs::write(&path, "timeout_secs = 7\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.timeout_secs, Some(7));
    }
}
