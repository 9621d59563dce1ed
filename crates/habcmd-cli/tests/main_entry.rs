//! Integration tests for the `habcmd` binary entry point.
//!
//! Verifies help output, user-facing error handling for malformed command
//! lines and an unavailable `hab` program, and that configured offline mode
//! reaches the tool.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn help_lists_commands() {
    let mut command = cargo_bin_cmd!("habcmd");
    command.arg("--help");
    command
        .assert()
        .success()
        .stdout(contains("install"))
        .stdout(contains("svc"));
}

#[test]
fn malformed_identifier_is_rejected() {
    let mut command = cargo_bin_cmd!("habcmd");
    command.args(["install", "core"]);
    command
        .assert()
        .code(2)
        .stderr(contains("between 2 and 4 segments"));
}

#[test]
fn missing_hab_binary_reports_spawn_failure() {
    let mut command = cargo_bin_cmd!("habcmd");
    command
        .env("HABCMD_HAB_BINARY", "/nonexistent/habcmd-test/hab")
        .args(["svc", "start", "core/redis"]);
    command
        .assert()
        .failure()
        .stderr(contains("start failed"));
}

/// Writes an executable stand-in for `hab` that echoes its arguments and the
/// offline install feature flag.
#[cfg(unix)]
fn stub_hab(dir: &tempfile::TempDir) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join("hab");
    std::fs::write(
        &path,
        "#!/bin/sh\necho \"args: $*\"\necho \"feature: $HAB_FEAT_OFFLINE_INSTALL\"\n",
    )
    .expect("write stub hab");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("make stub hab executable");
    path
}

#[cfg(unix)]
#[test]
fn offline_from_environment_reaches_hab() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let hab = stub_hab(&dir);
    let mut command = cargo_bin_cmd!("habcmd");
    command
        .current_dir(dir.path())
        .env("HABCMD_OFFLINE", "true")
        .env("HABCMD_HAB_BINARY", &hab)
        .args(["install", "core/redis"]);
    command
        .assert()
        .success()
        .stdout(contains("args: pkg install core/redis --offline"))
        .stdout(contains("feature: true"));
}

#[cfg(unix)]
#[test]
fn offline_flag_before_config_flags_reaches_hab() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let hab = stub_hab(&dir);
    let mut command = cargo_bin_cmd!("habcmd");
    command
        .current_dir(dir.path())
        .env_remove("HABCMD_OFFLINE")
        .arg("--offline")
        .arg("--hab-binary")
        .arg(&hab)
        .args(["install", "core/redis"]);
    command
        .assert()
        .success()
        .stdout(contains("args: pkg install core/redis --offline"));
}
