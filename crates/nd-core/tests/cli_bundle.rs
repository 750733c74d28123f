//! CLI tests for `ndctl debug bundle`.
//!
//! Verify exit codes and output for both the supported and the gated build.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the ndctl binary, isolated from the user's config.
fn ndctl(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ndctl").expect("ndctl binary should exist");
    cmd.env("ND_CONFIG_DIR", config_dir.path())
        .env_remove("ND_CONFIG")
        .env_remove("ND_LOG")
        .env_remove("ND_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .env_remove("KUBERNETES_SERVICE_HOST");
    cmd
}

mod arguments {
    use super::*;

    #[test]
    fn help_lists_bundle() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["debug", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("bundle"));
    }

    #[test]
    fn unknown_debug_subcommand_fails() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["debug", "nonexistent"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn version_reports_platform_support() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("debug bundle:"));
    }

    #[test]
    fn missing_explicit_config_is_args_error() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["--config"])
            .arg(cfg.path().join("missing.toml"))
            .args(["debug", "bundle"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("Config file not found"));
    }

    #[test]
    fn password_flag_is_rejected() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["debug", "bundle", "--password", "secret"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("--password"));
    }

    #[test]
    fn malformed_label_selector_is_args_error() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["debug", "bundle", "--label-selector", "novalue"])
            .assert()
            .code(10)
            .stderr(predicate::str::contains("invalid label selector"));
    }
}

mod logging {
    use super::*;

    const UNWRITABLE: &str = "/nonexistent-dir/x.zip";

    #[test]
    fn nd_log_debug_enables_debug_events() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .env("ND_LOG", "debug")
            .args(["debug", "bundle", "--output", UNWRITABLE])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Starting debug bundle"));
    }

    #[test]
    fn default_level_hides_debug_events() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["debug", "bundle", "--output", UNWRITABLE])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Starting debug bundle").not());
    }

    #[test]
    fn quiet_flag_overrides_nd_log() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .env("ND_LOG", "debug")
            .args(["-q", "debug", "bundle", "--output", UNWRITABLE])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Starting debug bundle").not());
    }

    #[test]
    fn nd_log_format_json_emits_json_lines() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .env("ND_LOG", "debug")
            .env("ND_LOG_FORMAT", "json")
            .args(["debug", "bundle", "--output", UNWRITABLE])
            .assert()
            .failure()
            .stderr(predicate::str::contains(r#""message":"Starting debug bundle""#));
    }
}

#[cfg(any(not(target_os = "linux"), feature = "gate-only"))]
mod gated {
    use super::*;

    #[test]
    fn bundle_reports_unsupported_platform() {
        let cfg = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        ndctl(&cfg)
            .current_dir(out.path())
            .args(["debug", "bundle"])
            .assert()
            .code(11)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("unsupported on your operating system"));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn k8s_bundle_reports_unsupported_platform() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["debug", "bundle", "--k8s", "--output", "/tmp/out.zip"])
            .assert()
            .code(11)
            .stderr(predicate::str::contains("unsupported on your operating system"));
    }

    #[test]
    fn version_says_unsupported() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("debug bundle: unsupported"));
    }
}

#[cfg(all(target_os = "linux", not(feature = "gate-only")))]
mod supported {
    use super::*;

    #[test]
    fn bundle_prints_archive_path() {
        let cfg = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        std::fs::create_dir_all(work.path().join("logs")).unwrap();
        std::fs::write(work.path().join("logs/node.log"), b"INFO ready\n").unwrap();
        let output = work.path().join("node.zip");

        ndctl(&cfg)
            .args(["debug", "bundle", "--output"])
            .arg(&output)
            .arg("--logs-dir")
            .arg(work.path().join("logs"))
            .assert()
            .success()
            .stdout(predicate::str::contains("node.zip"));

        assert!(output.exists());
    }

    #[test]
    fn bundle_uses_config_file_defaults() {
        let cfg = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        std::fs::write(work.path().join("node.yaml"), b"node_id: 7\n").unwrap();
        std::fs::write(
            cfg.path().join("bundle.toml"),
            format!("node_config = {:?}\n", work.path().join("node.yaml")),
        )
        .unwrap();
        let output = work.path().join("from-config.zip");

        ndctl(&cfg)
            .args(["debug", "bundle", "--output"])
            .arg(&output)
            .assert()
            .success();

        let reader = nd_archive::ArchiveReader::open(&output).unwrap();
        assert!(reader.has_file("config/node.yaml"));
    }

    #[test]
    fn wrong_extension_is_args_error() {
        let cfg = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["debug", "bundle", "--output"])
            .arg(work.path().join("out.tar.gz"))
            .assert()
            .code(10)
            .stderr(predicate::str::contains("extension must be .zip"));
    }

    #[test]
    fn k8s_outside_pod_is_capability_error() {
        let cfg = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        ndctl(&cfg)
            .args(["debug", "bundle", "--k8s", "--output"])
            .arg(work.path().join("k8s.zip"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("not running inside a k8s pod"));
    }

    #[test]
    fn version_says_supported() {
        let cfg = TempDir::new().unwrap();
        ndctl(&cfg)
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::contains("debug bundle: supported (linux)"));
    }
}
