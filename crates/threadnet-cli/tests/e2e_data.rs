//! E2E CLI tests for the data commands: `summary`, `clean`, `convert`.
//!
//! Each test runs the `threadnet` binary as a subprocess against CSV fixtures
//! in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const MESSAGES: &str = "\
msg_author_id,msg_topic_id,msg_date,msg_ip_address,msg_post
1,100,1704067200,10.0.0.1,<p>Hello <b>world</b></p>
2,100,1704153600,10.0.0.2,see https://example.com for details
1,101,1706745600,10.0.0.1,Another   post
3,101,1706832000,10.0.0.3,hi
1,100,1706918400,10.0.0.1,again
";

fn threadnet(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("threadnet"));
    cmd.current_dir(dir);
    cmd.env("THREADNET_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn fixture(dir: &Path) -> PathBuf {
    let path = dir.join("messages.csv");
    fs::write(&path, MESSAGES).expect("write fixture");
    path
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = threadnet(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("threadnet should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

// ---------------------------------------------------------------------------
// summary
// ---------------------------------------------------------------------------

#[test]
fn summary_counts_distinct_values() {
    let dir = TempDir::new().expect("tempdir");
    fixture(dir.path());

    let json = run_json(dir.path(), &["summary", "messages.csv"]);
    assert_eq!(json["total_messages"], 5);
    assert_eq!(json["unique_authors"], 3);
    assert_eq!(json["unique_topics"], 2);
    assert_eq!(json["unique_ips"], 3);
    assert_eq!(json["columns"].as_array().map(Vec::len), Some(5));
    assert_eq!(json["date_range"][0], 1_704_067_200);
    assert_eq!(json["date_range"][1], 1_706_918_400);
}

#[test]
fn summary_text_mode_is_key_value() {
    let dir = TempDir::new().expect("tempdir");
    fixture(dir.path());

    threadnet(dir.path())
        .args(["summary", "messages.csv", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total_messages=5"))
        .stdout(predicate::str::contains("unique_authors=3"));
}

#[test]
fn summary_rejects_unsupported_extension() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("messages.json"), "[]").expect("write");

    let output = threadnet(dir.path())
        .args(["summary", "messages.json", "--format", "json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let err: Value = serde_json::from_slice(&output.stderr).expect("error JSON on stderr");
    assert_eq!(err["error"]["error_code"], "unsupported_format");
}

#[test]
fn load_failure_leaves_stderr_to_the_error_envelope() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("messages.parquet"), "PAR1").expect("write");

    let output = threadnet(dir.path())
        .env_remove("THREADNET_LOG")
        .env_remove("DEBUG")
        .args(["--json", "summary", "messages.parquet"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let err: Value = serde_json::from_slice(&output.stderr).expect("only error JSON on stderr");
    assert_eq!(err["error"]["error_code"], "unsupported_format");
}

#[test]
fn missing_file_fails_cleanly() {
    let dir = TempDir::new().expect("tempdir");

    threadnet(dir.path())
        .args(["summary", "nope.csv", "--format", "text"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("nope.csv"));
}

// ---------------------------------------------------------------------------
// clean
// ---------------------------------------------------------------------------

#[test]
fn clean_strips_markup_and_urls() {
    let dir = TempDir::new().expect("tempdir");
    fixture(dir.path());

    let json = run_json(
        dir.path(),
        &["clean", "messages.csv", "-o", "clean.csv", "--columns", "msg_post"],
    );
    assert_eq!(json["method"], "advanced");
    assert_eq!(json["rows"], 5);

    let cleaned = fs::read_to_string(dir.path().join("clean.csv")).expect("read output");
    assert!(cleaned.contains("Hello world"));
    assert!(cleaned.contains("Another post"));
    assert!(!cleaned.contains("<p>"));
    assert!(!cleaned.contains("https://"));
}

#[test]
fn clean_html_only_keeps_urls() {
    let dir = TempDir::new().expect("tempdir");
    fixture(dir.path());

    run_json(
        dir.path(),
        &[
            "clean",
            "messages.csv",
            "-o",
            "clean.csv",
            "--columns",
            "msg_post",
            "--method",
            "html_only",
        ],
    );
    let cleaned = fs::read_to_string(dir.path().join("clean.csv")).expect("read output");
    assert!(cleaned.contains("Hello world"));
    assert!(cleaned.contains("https://example.com"));
}

#[test]
fn clean_unknown_column_reports_code() {
    let dir = TempDir::new().expect("tempdir");
    fixture(dir.path());

    let output = threadnet(dir.path())
        .args(["clean", "messages.csv", "-o", "x.csv", "--columns", "body", "--format", "json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let err: Value = serde_json::from_slice(&output.stderr).expect("error JSON on stderr");
    assert_eq!(err["error"]["error_code"], "column_not_found");
    assert!(!dir.path().join("x.csv").exists());
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

#[test]
fn convert_adds_utc_column_and_filters() {
    let dir = TempDir::new().expect("tempdir");
    fixture(dir.path());

    let json = run_json(
        dir.path(),
        &[
            "convert",
            "messages.csv",
            "-o",
            "slim.csv",
            "--timestamp",
            "msg_date",
            "--keep",
            "msg_author_id,msg_date_UTC,not_there",
        ],
    );
    assert_eq!(json["rows"], 5);
    assert_eq!(json["columns"], serde_json::json!(["msg_author_id", "msg_date_UTC"]));

    let slim = fs::read_to_string(dir.path().join("slim.csv")).expect("read output");
    let mut lines = slim.lines();
    assert_eq!(lines.next(), Some("msg_author_id,msg_date_UTC"));
    assert_eq!(lines.next(), Some("1,2024-01-01 00:00:00"));
}

#[test]
fn convert_round_trips_through_xlsx() {
    let dir = TempDir::new().expect("tempdir");
    fixture(dir.path());

    run_json(dir.path(), &["convert", "messages.csv", "-o", "book.xlsx"]);
    assert!(dir.path().join("book.xlsx").is_file());

    run_json(dir.path(), &["convert", "book.xlsx", "-o", "back.csv"]);
    let json = run_json(dir.path(), &["summary", "back.csv"]);
    assert_eq!(json["total_messages"], 5);
    assert_eq!(json["unique_authors"], 3);
}
