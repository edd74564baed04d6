//! End-to-end tests for the `sluice` binary.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Runs `sluice` in an isolated working directory.
fn sluice(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sluice").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("SLUICE_TRANSFER__CHUNK_SIZE")
        .env_remove("SLUICE_LOG__LEVEL");
    cmd
}

// ============================================================================
// Help and argument parsing
// ============================================================================

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("echo"))
        .stdout(predicate::str::contains("cat"))
        .stdout(predicate::str::contains("peek"))
        .stdout(predicate::str::contains("--chunk-size"));
}

#[test]
fn zero_chunk_size_flag_is_rejected() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["--chunk-size", "0", "echo"])
        .assert()
        .failure();
}

// ============================================================================
// Status
// ============================================================================

#[test]
fn status_describes_known_codes() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["status", "0x31"])
        .assert()
        .success()
        .stdout("0x31 (i/o): end of stream reached\n");

    sluice(&dir)
        .args(["status", "18"])
        .assert()
        .success()
        .stdout("0x12 (user call): invalid argument provided\n");
}

#[test]
fn status_of_unassigned_code_is_unknown() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["status", "0x99"])
        .assert()
        .success()
        .stdout("0x99 (unassigned): unknown status code\n");
}

#[test]
fn status_rejects_garbage() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["status", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid status code 'nope'"));
}

// ============================================================================
// Echo
// ============================================================================

#[test]
fn echo_writes_stdin_back() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .arg("echo")
        .write_stdin("hello")
        .assert()
        .success()
        .stdout("hello");
}

#[test]
fn echo_reads_at_most_one_chunk() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["--chunk-size", "4", "echo"])
        .write_stdin("hello world")
        .assert()
        .success()
        .stdout("hell");
}

#[test]
fn echo_on_empty_stdin_reports_end_of_stream() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .arg("echo")
        .write_stdin("")
        .assert()
        .code(0x31)
        .stdout("")
        .stderr(predicate::str::contains("sluice: end of stream reached"));
}

// ============================================================================
// Cat
// ============================================================================

#[test]
fn cat_concatenates_files_in_order() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "first\n").unwrap();
    fs::write(dir.path().join("b.txt"), "second\n").unwrap();

    sluice(&dir)
        .args(["--chunk-size", "3", "cat", "a.txt", "b.txt"])
        .assert()
        .success()
        .stdout("first\nsecond\n");
}

#[test]
fn cat_dash_reads_stdin() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "file ").unwrap();

    sluice(&dir)
        .args(["cat", "a.txt", "-"])
        .write_stdin("stdin")
        .assert()
        .success()
        .stdout("file stdin");
}

#[test]
fn cat_missing_file_exits_with_system_code() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["cat", "missing.txt"])
        .assert()
        .code(0x2)
        .stderr(predicate::str::contains("sluice: missing.txt"))
        .stderr(predicate::str::contains("No such file or directory"));
}

#[test]
fn cat_empty_file_prints_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();

    sluice(&dir)
        .args(["cat", "empty.txt"])
        .assert()
        .success()
        .stdout("");
}

// ============================================================================
// Write
// ============================================================================

#[test]
fn write_creates_file_from_stdin() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["write", "out.txt"])
        .write_stdin("payload")
        .assert()
        .success();

    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"payload");
}

#[test]
fn write_append_extends_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("log.txt"), "one\n").unwrap();

    sluice(&dir)
        .args(["write", "--append", "log.txt"])
        .write_stdin("two\n")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("log.txt")).unwrap(),
        "one\ntwo\n"
    );
}

#[test]
fn write_overwrites_from_start_without_truncating() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.txt"), "0123456789").unwrap();

    sluice(&dir)
        .args(["write", "data.txt"])
        .write_stdin("ab")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("data.txt")).unwrap(),
        "ab23456789"
    );
}

#[test]
fn write_help_describes_overwrite() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["write", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not truncated"));
}

#[test]
fn write_no_create_requires_existing_file() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["write", "--no-create", "absent.txt"])
        .write_stdin("x")
        .assert()
        .code(0x2)
        .stderr(predicate::str::contains("absent.txt"));

    assert!(!dir.path().join("absent.txt").exists());
}

// ============================================================================
// Peek
// ============================================================================

#[test]
fn peek_reads_from_offset() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("digits.txt"), "0123456789").unwrap();

    sluice(&dir)
        .args(["peek", "digits.txt", "--offset", "2", "--length", "3"])
        .assert()
        .success()
        .stdout("234");
}

#[test]
fn peek_from_end_stops_at_end_of_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("digits.txt"), "0123456789").unwrap();

    sluice(&dir)
        .args(["peek", "digits.txt", "--offset", "4", "--from-end", "--length", "10"])
        .assert()
        .success()
        .stdout("6789");
}

#[test]
fn peek_before_start_is_invalid_argument() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("digits.txt"), "0123456789").unwrap();

    sluice(&dir)
        .args(["peek", "digits.txt", "--offset", "11", "--from-end"])
        .assert()
        .code(0x12)
        .stderr(predicate::str::contains("invalid argument provided"));
}

// ============================================================================
// Standard streams
// ============================================================================

#[test]
fn failed_descriptor_duplication_reports_system_error() {
    let dir = TempDir::new().unwrap();
    let binary = assert_cmd::cargo::cargo_bin("sluice");

    // Only descriptors 0, 1 and 2 fit, so duplicating them must fail.
    Command::new("sh")
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .arg("-c")
        .arg("ulimit -n 3 && exec \"$0\" status 0")
        .arg(binary)
        .assert()
        .code(0x2)
        .stdout("")
        .stderr(predicate::str::contains("sluice: Too many open files"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn chunk_size_from_environment() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .env("SLUICE_TRANSFER__CHUNK_SIZE", "2")
        .arg("echo")
        .write_stdin("hello")
        .assert()
        .success()
        .stdout("he");
}

#[test]
fn chunk_size_from_project_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sluice.toml"), "[transfer]\nchunk_size = 3\n").unwrap();

    sluice(&dir)
        .arg("echo")
        .write_stdin("hello")
        .assert()
        .success()
        .stdout("hel");
}

#[test]
fn zero_chunk_size_in_config_fails() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .env("SLUICE_TRANSFER__CHUNK_SIZE", "0")
        .args(["status", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("chunk_size"));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    sluice(&dir)
        .args(["--config", "nowhere.toml", "status", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration"));
}
