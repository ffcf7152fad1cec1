//! Integration tests for CLI startup

#![allow(deprecated)]

use assert_cmd::{assert::OutputAssertExt, cargo::CommandCargoExt};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

/// Command isolated from the developer's environment, config and `.env`
fn sentrifocus(tmp: &TempDir) -> Command {
    let config = tmp.path().join("config.toml");
    std::fs::write(&config, "[server]\nport = 0\n").unwrap();

    let mut cmd = Command::cargo_bin("sentrifocus").unwrap();
    cmd.current_dir(tmp.path())
        .env_remove("GROQ_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("sentrifocus").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_serve_refuses_to_start_without_api_key() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = sentrifocus(&tmp);
    cmd.arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("GROQ_API_KEY not found"));
}

#[test]
fn test_default_command_refuses_to_start_without_api_key() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = sentrifocus(&tmp);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("GROQ_API_KEY"));
}

#[test]
fn test_blank_api_key_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut cmd = sentrifocus(&tmp);
    cmd.env("GROQ_API_KEY", "  ")
        .arg("check")
        .arg("--goal")
        .arg("Learn Rust")
        .arg("--url")
        .arg("https://doc.rust-lang.org");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("GROQ_API_KEY not found"));
}

#[test]
fn test_invalid_config_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let bad = tmp.path().join("bad.toml");
    std::fs::write(&bad, "[server\n").unwrap();

    let mut cmd = Command::cargo_bin("sentrifocus").unwrap();
    cmd.current_dir(tmp.path())
        .env("GROQ_API_KEY", "gsk_test")
        .arg("--config")
        .arg(&bad)
        .arg("serve");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_dotenv_log_filter_applies() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(".env"), "RUST_LOG=sentrifocus=debug\n").unwrap();
    let mut cmd = sentrifocus(&tmp);
    cmd.arg("serve");

    // The .env filter enables the debug line reporting the .env load itself
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Loaded environment from"))
        .stderr(predicate::str::contains("GROQ_API_KEY not found"));
}
