//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use ocular_test_support::SyntheticEyeBuilder;
use predicates::prelude::*;

fn write_eye(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    SyntheticEyeBuilder::new(400, 300).build_rgb().save(&path).unwrap();
    path
}

fn ocular(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ocular").unwrap();
    cmd.current_dir(cwd);
    cmd
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    ocular(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    let temp_dir = tempfile::tempdir().unwrap();
    ocular(temp_dir.path())
        .arg("/nonexistent/path/to/eye.png")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    ocular(temp_dir.path())
        .arg(temp_dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let eye = write_eye(temp_dir.path(), "eye.png");

    ocular(temp_dir.path())
        .arg("--format")
        .arg("xml")
        .arg(eye)
        .assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_valid_formats_accepted() {
    let temp_dir = tempfile::tempdir().unwrap();
    let eye = write_eye(temp_dir.path(), "eye.png");

    for format in ["json", "jsonl"] {
        ocular(temp_dir.path())
            .arg("--format")
            .arg(format)
            .arg("--no-landmarks")
            .arg(&eye)
            .assert()
            .code(0);
    }
}

// === Calibration Flag Validation ===

#[test]
fn test_negative_gain_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    ocular(temp_dir.path())
        .arg("--fatigue-gain=-1")
        .arg("eye.png")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("non-negative"));
}

#[test]
fn test_non_numeric_gain_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    ocular(temp_dir.path())
        .arg("--dry-eye-gain")
        .arg("abc")
        .arg("eye.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_gain_flags_accepted() {
    let temp_dir = tempfile::tempdir().unwrap();
    let eye = write_eye(temp_dir.path(), "eye.png");

    ocular(temp_dir.path())
        .arg("--fatigue-gain")
        .arg("0")
        .arg("--dry-eye-gain")
        .arg("300")
        .arg("--no-landmarks")
        .arg(eye)
        .assert()
        .code(0);
}

// === Verbosity Level Tests ===

#[test]
fn test_verbosity_levels() {
    let temp_dir = tempfile::tempdir().unwrap();
    let eye = write_eye(temp_dir.path(), "eye.png");

    for flag in ["-v", "-vv", "-vvv"] {
        ocular(temp_dir.path())
            .arg(flag)
            .arg("--no-landmarks")
            .arg(&eye)
            .assert()
            .code(0);
    }
}

#[test]
fn test_info_verbosity_logs_disabled_landmarks() {
    let temp_dir = tempfile::tempdir().unwrap();
    let eye = write_eye(temp_dir.path(), "eye.png");

    ocular(temp_dir.path())
        .arg("-v")
        .arg("--no-landmarks")
        .arg(eye)
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Landmark provider disabled"));
}

#[test]
fn test_quiet_suppresses_progress() {
    let temp_dir = tempfile::tempdir().unwrap();
    let black = temp_dir.path().join("black.png");
    image::RgbImage::new(64, 48).save(&black).unwrap();

    ocular(temp_dir.path())
        .arg("--quiet")
        .arg("--no-landmarks")
        .arg(black)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no eye assessed").not());
}

#[test]
fn test_failures_listed_without_progress_bar() {
    let temp_dir = tempfile::tempdir().unwrap();
    let black = temp_dir.path().join("black.png");
    image::RgbImage::new(64, 48).save(&black).unwrap();

    ocular(temp_dir.path())
        .arg("--no-landmarks")
        .arg(black)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("black.png: no eye assessed (geometry_validation)"));
}

// === Multiple Paths ===

#[test]
fn test_multiple_paths() {
    let temp_dir = tempfile::tempdir().unwrap();
    let eye = write_eye(temp_dir.path(), "eye.png");

    let output = ocular(temp_dir.path())
        .arg("--no-landmarks")
        .arg(&eye)
        .arg(&eye)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 2);
}

// === Recursive Flag ===

#[test]
fn test_recursive_flag() {
    let temp_dir = tempfile::tempdir().unwrap();
    let sub_dir = temp_dir.path().join("subdir");
    std::fs::create_dir(&sub_dir).unwrap();
    write_eye(&sub_dir, "eye.png");

    // Without -r, the nested image is not found
    ocular(temp_dir.path())
        .arg("--no-landmarks")
        .arg(temp_dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    ocular(temp_dir.path())
        .arg("-r")
        .arg("--no-landmarks")
        .arg(temp_dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("eye.png"));
}

// === Help and Version ===

#[test]
fn test_help_flag() {
    Command::cargo_bin("ocular")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--landmarks-dir"))
        .stdout(predicate::str::contains("--fatigue-gain"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("ocular")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ocular"));
}

// === Subcommands ===

#[test]
fn test_analyze_subcommand() {
    let temp_dir = tempfile::tempdir().unwrap();
    let eye = write_eye(temp_dir.path(), "eye.png");

    ocular(temp_dir.path())
        .arg("analyze")
        .arg("--no-landmarks")
        .arg(eye)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"success\":true"));
}

#[test]
fn test_calibration_subcommand() {
    let temp_dir = tempfile::tempdir().unwrap();
    ocular(temp_dir.path())
        .arg("calibration")
        .arg("--defaults")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[calibration]"))
        .stdout(predicate::str::contains("fatigue_gain = 200.0"))
        .stdout(predicate::str::contains("dry_eye_default = 45.0"));
}
