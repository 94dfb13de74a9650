//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and startup failures.
//! None of these reach a perception service.

#![allow(clippy::unwrap_used)]

mod common;

use common::{passport_photo, with_credentials, CREDENTIAL_VARS};
use predicates::prelude::*;

// === Help ===

#[test]
fn test_help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve").and(predicate::str::contains("check")));
}

#[test]
fn test_check_help_lists_rule_flags() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--min-face-area-ratio")
                .and(predicate::str::contains("--max-background-stddev"))
                .and(predicate::str::contains("--timeout-secs")),
        );
}

// === Credentials ===

#[test]
fn test_serve_without_credentials_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let mut expected = predicate::str::contains("missing required environment variables").boxed();
    for var in CREDENTIAL_VARS {
        expected = expected.and(predicate::str::contains(var)).boxed();
    }

    passport_photo(dir.path()).assert().code(2).stderr(expected);
}

#[test]
fn test_check_without_credentials_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .args(["check", "photo.jpg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("AZURE_VISION_API_KEY"));
}

#[test]
fn test_partial_credentials_name_only_missing_vars() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = passport_photo(dir.path());
    cmd.env("AZURE_FACES_API_ENDPOINT", "http://127.0.0.1:1")
        .env("AZURE_FACES_API_KEY", "k")
        .env("AZURE_VISION_API_KEY", "   ");

    cmd.arg("serve").assert().code(2).stderr(
        predicate::str::contains("AZURE_MODERATION_API_ENDPOINT")
            .and(predicate::str::contains("AZURE_VISION_API_KEY"))
            .and(predicate::str::contains("AZURE_FACES_API_KEY").not()),
    );
}

#[test]
fn test_dotenv_file_supplies_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let env: String = CREDENTIAL_VARS
        .iter()
        .map(|var| format!("{var}=http://127.0.0.1:1\n"))
        .collect();
    std::fs::write(dir.path().join(".env"), env).unwrap();
    std::fs::create_dir(dir.path().join("photos")).unwrap();

    // An empty directory needs no service call: success proves the
    // credentials were accepted.
    passport_photo(dir.path())
        .args(["check", "photos"])
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

// === Paths ===

#[test]
fn test_check_requires_paths() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PATHS").or(predicate::str::contains("required")));
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = passport_photo(dir.path());
    with_credentials(&mut cmd, "http://127.0.0.1:1");

    cmd.args(["check", "/nonexistent/path/to/photo.jpg"])
        .assert()
        .code(0)
        .stderr(predicate::str::contains("does not exist"));
}

// === Value validation ===

#[test]
fn test_ratio_above_one_rejected() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .args(["check", "--min-face-area-ratio", "1.5", "photo.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1.5 is not in 0..=1"));
}

#[test]
fn test_brightness_above_255_rejected() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .args(["serve", "--max-brightness", "300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("300 is not in 0..=255"));
}

#[test]
fn test_angle_non_numeric_rejected() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .args(["check", "--max-yaw", "abc", "photo.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid number"));
}

#[test]
fn test_zero_timeout_rejected() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .args(["check", "--timeout-secs", "0", "photo.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
}

#[test]
fn test_invalid_format_rejected() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .args(["check", "--format", "xml", "photo.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_inverted_brightness_range_rejected() {
    let dir = tempfile::tempdir().unwrap();
    passport_photo(dir.path())
        .args(["check", "--min-brightness", "220", "photo.jpg"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("exceeds maximum brightness 200"));
}
