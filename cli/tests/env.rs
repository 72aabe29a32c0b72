//! # execrs Env Command Integration Tests
//!
//! File: cli/tests/env.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Checks the environment list printed by `execrs env`: inherited variables
//! first, overrides appended after them, duplicates kept.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_env_without_overrides_lists_inherited() {
    let dir = tempdir().unwrap();
    execrs_cmd_isolated(dir.path())
        .env("EXECRS_VISIBLE", "yes")
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("EXECRS_VISIBLE=yes\n"));
}

#[test]
fn test_env_override_is_appended_after_inherited() {
    let dir = tempdir().unwrap();
    let output = execrs_cmd_isolated(dir.path())
        .env("EXECRS_DUP", "inherited")
        .args(["env", "-e", "EXECRS_DUP=override"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let inherited = stdout.find("EXECRS_DUP=inherited\n").expect("inherited entry missing");
    let overridden = stdout.find("EXECRS_DUP=override\n").expect("override entry missing");
    assert!(inherited < overridden);
    assert!(stdout.ends_with("EXECRS_DUP=override\n"));
}

#[test]
fn test_env_includes_configured_overrides() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(".execrs.toml"),
        "[run.env]\nEXECRS_CONFIGURED = \"1\"\n",
    )
    .unwrap();
    execrs_cmd_isolated(dir.path())
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("EXECRS_CONFIGURED=1\n"));
}
