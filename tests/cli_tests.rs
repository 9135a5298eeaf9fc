//! Command-line behaviour of the `slicer` binary

use assert_cmd::Command;
use predicates::prelude::*;

fn slicer(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("slicer").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SLICER_CONFIG")
        .env_remove("RUST_LOG")
        // Any launch attempt would fail with exit code 1, not 2
        .env("SLICER_FFMPEG", "/nonexistent/ffmpeg")
        .env("SLICER_FFPROBE", "/nonexistent/ffprobe");
    cmd
}

#[test]
fn test_reversed_range_is_user_error() {
    let dir = tempfile::tempdir().unwrap();
    slicer(&dir)
        .args(["slice", "input.mp4", "5", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn test_malformed_timecode_is_user_error() {
    let dir = tempfile::tempdir().unwrap();
    slicer(&dir)
        .args(["slice", "input.mp4", "1:61", "2:00"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid timecode '1:61'"));
}

#[test]
fn test_missing_input_is_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    slicer(&dir)
        .args(["slice", "missing.mp4", "1", "3", "--output", "out.mp4"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.mp4"));
    assert!(!dir.path().join("out.mp4").exists());
}

#[test]
fn test_invalid_settings_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("slicer.toml"), "[slice]\nmargin = -1.0\n").unwrap();
    slicer(&dir)
        .args(["probe", "input.mp4"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("margin"));
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    slicer(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("slice").and(predicate::str::contains("probe")));
}
