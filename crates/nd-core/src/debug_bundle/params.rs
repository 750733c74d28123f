//! Bundle collection parameters.

use super::BundleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default cap on the total bytes of log tails in one bundle (100 MiB).
pub const DEFAULT_LOGS_SIZE_LIMIT: u64 = 100 * 1024 * 1024;

/// Default time budget for one collection run.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// What to collect and where to write it.
///
/// Consumed read-only by the collector. `params.json` inside the archive is
/// this value serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleParams {
    /// Output archive path. `Some` means the user chose it explicitly.
    pub output: Option<PathBuf>,
    /// Node configuration file to include.
    pub node_config: Option<PathBuf>,
    /// Directory whose `*.log` files are tailed into the bundle.
    pub logs_dir: Option<PathBuf>,
    /// Data directory to list (names and sizes only).
    pub data_dir: Option<PathBuf>,
    /// Total byte budget for log tails.
    pub logs_size_limit: u64,
    pub timeout_secs: u64,
    /// k8s namespace; the pod's own namespace when unset.
    pub namespace: Option<String>,
    pub label_selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl Default for BundleParams {
    fn default() -> Self {
        Self {
            output: None,
            node_config: None,
            logs_dir: None,
            data_dir: None,
            logs_size_limit: DEFAULT_LOGS_SIZE_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            namespace: None,
            label_selector: BTreeMap::new(),
            credentials: None,
        }
    }
}

impl BundleParams {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The output path hint and whether it was user-supplied.
    pub fn output_hint(&self) -> (PathBuf, bool) {
        match &self.output {
            Some(path) => (path.clone(), true),
            None => (PathBuf::new(), false),
        }
    }
}

/// Admin API identity recorded with the bundle.
///
/// No admin API is called during collection, so no secret is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub user: String,
}

/// Parse `key=value[,key=value...]` into a selector map.
///
/// An empty string is an empty selector.
pub fn parse_label_selector(raw: &str) -> Result<BTreeMap<String, String>, BundleError> {
    let mut selector = BTreeMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| BundleError::InvalidSelector(raw.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(BundleError::InvalidSelector(raw.to_string()));
        }
        selector.insert(key.to_string(), value.trim().to_string());
    }
    Ok(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = BundleParams::default();
        assert_eq!(params.logs_size_limit, DEFAULT_LOGS_SIZE_LIMIT);
        assert_eq!(params.timeout(), Duration::from_secs(30));
        assert_eq!(params.output_hint(), (PathBuf::new(), false));
    }

    #[test]
    fn test_output_hint_explicit() {
        let params = BundleParams {
            output: Some(PathBuf::from("/tmp/out.zip")),
            ..Default::default()
        };
        assert_eq!(params.output_hint(), (PathBuf::from("/tmp/out.zip"), true));
    }

    #[test]
    fn test_credentials_carry_user_only() {
        let params = BundleParams {
            credentials: Some(Credentials {
                user: "admin".to_string(),
            }),
            ..Default::default()
        };

        let json: serde_json::Value = serde_json::to_value(&params).unwrap();
        assert_eq!(json["credentials"], serde_json::json!({ "user": "admin" }));
        assert!(!json.to_string().contains("password"));
    }

    #[test]
    fn test_parse_label_selector() {
        let selector = parse_label_selector("app=nodediag, tier = broker").unwrap();
        assert_eq!(selector.get("app").map(String::as_str), Some("nodediag"));
        assert_eq!(selector.get("tier").map(String::as_str), Some("broker"));

        assert!(parse_label_selector("").unwrap().is_empty());
        assert!(parse_label_selector("app").is_err());
        assert!(parse_label_selector("=x").is_err());
    }
}
