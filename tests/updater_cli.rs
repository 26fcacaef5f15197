//! End-to-end tests for `nekoray-updater`.
//!
//! The role comes from the executable name, so each test links the built
//! binary into a scratch directory under the name it needs and runs it from there.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn scratch_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("nekoray-it-")
        .tempdir_in(env!("CARGO_TARGET_TMPDIR"))
        .unwrap()
}

/// Place the updater binary in `dir` as `name`.
fn install_as(dir: &Path, name: &str) -> PathBuf {
    let target = dir.join(name);
    let built = Path::new(env!("CARGO_BIN_EXE_nekoray-updater"));
    if std::fs::hard_link(built, &target).is_err() {
        std::fs::copy(built, &target).unwrap();
    }
    target
}

fn write_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

fn wait_for_file(path: &Path) -> String {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Ok(content) = std::fs::read_to_string(path) {
            if !content.is_empty() {
                return content;
            }
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("{} never appeared", path.display());
}

#[test]
fn updater_swaps_staged_components_then_starts_main_app() {
    let dir = scratch_dir();
    let updater = install_as(dir.path(), "nekoray-updater");
    std::fs::write(dir.path().join("nekoray-cli"), b"old cli").unwrap();
    std::fs::write(dir.path().join("nekoray-cli.new"), b"new cli").unwrap();
    write_script(dir.path(), "nekoray-daemon", "echo \"started $@\" > started.txt");

    Command::new(&updater)
        .assert()
        .success()
        .stdout(predicate::str::contains("NekoRay Updater v1.0.3"))
        .stderr(predicate::str::contains("Updated nekoray-cli"));

    assert_eq!(std::fs::read(dir.path().join("nekoray-cli")).unwrap(), b"new cli");
    assert!(!dir.path().join("nekoray-cli.new").exists());
    let mode = std::fs::metadata(dir.path().join("nekoray-cli"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111);

    let started = wait_for_file(&dir.path().join("started.txt"));
    assert_eq!(started.trim(), "started");
}

#[test]
fn failed_update_still_launches() {
    let dir = scratch_dir();
    let updater = install_as(dir.path(), "NekoUpdaterX64");
    std::fs::create_dir(dir.path().join("nekoray-web")).unwrap();
    std::fs::write(dir.path().join("nekoray-web/index.html"), b"<html>").unwrap();
    std::fs::write(dir.path().join("nekoray-web.new"), b"new web").unwrap();
    write_script(dir.path(), "nekoray", "echo main > started.txt");

    Command::new(&updater)
        .arg("--wait")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to update nekoray-web"));

    assert!(dir.path().join("nekoray-web.new").exists());
    assert!(dir.path().join("nekoray-web/index.html").exists());
    assert_eq!(wait_for_file(&dir.path().join("started.txt")).trim(), "main");
}

#[test]
fn updater_without_candidates_reports_nothing_to_start() {
    let dir = scratch_dir();
    let updater = install_as(dir.path(), "nekoray-updater");

    Command::new(&updater)
        .assert()
        .success()
        .stderr(predicate::str::contains("No main application found to start"));
}

#[test]
fn launcher_falls_back_to_cli_daemon_mode() {
    let dir = scratch_dir();
    let launcher = install_as(dir.path(), "my-launcher-tool");
    write_script(dir.path(), "nekoray-cli", "echo \"$@\" > args.txt");

    Command::new(&launcher)
        .arg("--wait")
        .assert()
        .success()
        .stderr(predicate::str::contains("NekoRay Launcher"));

    assert_eq!(wait_for_file(&dir.path().join("args.txt")).trim(), "daemon");
}

#[test]
fn launcher_with_nothing_installed() {
    let dir = scratch_dir();
    let launcher = install_as(dir.path(), "nekoray-launcher");

    Command::new(&launcher)
        .assert()
        .success()
        .stderr(predicate::str::contains("No NekoRay components found to launch"));
}

#[test]
fn non_utf8_invocation_name_is_classified() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::process::CommandExt;

    let dir = scratch_dir();
    let launcher = install_as(dir.path(), "nekoray-launcher");
    let mut cmd = std::process::Command::new(&launcher);
    cmd.arg0(OsStr::from_bytes(b"neko\xfflauncher"));

    Command::from_std(cmd)
        .assert()
        .success()
        .stderr(predicate::str::contains("NekoRay Launcher"))
        .stderr(predicate::str::contains("No NekoRay components found to launch"));
}

#[test]
fn non_utf8_flag_is_rejected_without_panicking() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = scratch_dir();
    let updater = install_as(dir.path(), "nekoray-updater");

    Command::new(&updater)
        .arg(OsStr::from_bytes(b"--w\xffit"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown argument"));
}

#[test]
fn unrecognized_name_prints_usage() {
    let dir = scratch_dir();
    let app = install_as(dir.path(), "app");
    std::fs::write(dir.path().join("nekoray-cli.new"), b"new cli").unwrap();

    Command::new(&app)
        .assert()
        .success()
        .stdout(predicate::str::contains("launcher   - Launch NekoRay daemon/CLI"));

    // No role, no update.
    assert!(dir.path().join("nekoray-cli.new").exists());
}

#[test]
fn ambiguous_name_requires_explicit_role() {
    let dir = scratch_dir();
    let both = install_as(dir.path(), "updater-launcher");
    write_script(dir.path(), "nekoray-daemon", "echo \"$@\" > args.txt");

    Command::new(&both)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --role"));

    Command::new(&both)
        .args(["--role", "launcher", "--wait"])
        .assert()
        .success();
    assert_eq!(wait_for_file(&dir.path().join("args.txt")).trim(), "--port 8080");
}
