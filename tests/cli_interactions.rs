//! CLI option and error-path tests
//!
//! Every case here fails or exits before an ICMP socket is opened, so the
//! tests need neither network access nor raw-socket privileges.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "PING_TARGET",
    "PING_TIMEOUT_MS",
    "PING_INTERVAL_MS",
    "COLOR_EFFECT",
    "ENABLE_COLOR",
    "SKIN",
];

/// Command with a clean environment and no ./.env lookup
fn create_test_cmd() -> Command {
    let mut cmd = Command::cargo_bin("pingcrystal").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--env-file").arg("/nonexistent/pingcrystal.env");
    cmd
}

/// Helper function to create temporary configuration files
fn create_temp_config(content: &str) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(".env");
    fs::write(&config_path, content).unwrap();
    let config_path_str = config_path.to_str().unwrap().to_string();
    (temp_dir, config_path_str)
}

#[test]
fn test_help_lists_options_and_controls() {
    Command::cargo_bin("pingcrystal")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--target"))
        .stdout(predicate::str::contains("--color-effect"))
        .stdout(predicate::str::contains("--skin"))
        .stdout(predicate::str::contains("Controls"));
}

#[test]
fn test_version() {
    Command::cargo_bin("pingcrystal")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pingcrystal"));
}

#[test]
fn test_target_must_be_an_address() {
    create_test_cmd()
        .args(["--target", "dns.google"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_out_of_range_timing_is_rejected() {
    for args in [
        ["--timeout-ms", "0"],
        ["--timeout-ms", "10001"],
        ["--interval-ms", "0"],
        ["--count", "0"],
    ] {
        create_test_cmd().args(args).assert().failure();
    }
}

#[test]
fn test_conflicting_color_flags() {
    create_test_cmd()
        .args(["--color", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot specify both --color and --no-color"));
}

#[test]
fn test_invalid_env_value_is_a_config_error() {
    create_test_cmd()
        .env("PING_TIMEOUT_MS", "soon")
        .arg("--no-color")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PING_TIMEOUT_MS"))
        .stderr(predicate::str::contains("Configuration help"));
}

#[test]
fn test_multicast_target_from_env_file() {
    let (_dir, path) = create_temp_config("PING_TARGET=224.0.0.1\n");

    let mut cmd = Command::cargo_bin("pingcrystal").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.args(["--env-file", path.as_str(), "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("multicast"));
}

#[test]
fn test_invalid_log_format() {
    create_test_cmd()
        .args(["--log-format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xml"));
}

#[test]
fn test_help_topics() {
    create_test_cmd()
        .args(["--help-topic", "env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PING_TIMEOUT_MS"));

    create_test_cmd()
        .args(["--help-topic", "controls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("toggle the latency color effect"));

    create_test_cmd()
        .args(["--help-topic", "dns"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown help topic"));
}

#[test]
fn test_init_env_writes_example() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("example.env");

    create_test_cmd()
        .arg("--init-env")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote example configuration"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("PING_TARGET"));
    assert!(content.contains("COLOR_EFFECT"));
}
