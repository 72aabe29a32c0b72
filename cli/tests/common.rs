//! # execrs CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration test files in `cli/tests/`. Each test
//! file is compiled as its own crate and pulls this in with `mod common;`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// # Get execrs Command (`execrs_cmd`)
///
/// Creates an `assert_cmd::Command` pointing at the compiled `execrs` binary.
///
/// The binary runs with `HOME` and `XDG_CONFIG_HOME` pointed at `config_home`
/// so a user configuration on the test machine cannot leak into results.
///
/// ## Panics
/// Panics if the `execrs` binary cannot be found via `Command::cargo_bin`.
pub fn execrs_cmd_in(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("execrs").expect("Failed to find execrs binary for testing");
    cmd.env("XDG_CONFIG_HOME", config_home.join(".config"))
        .env("HOME", config_home);
    cmd
}

/// Like `execrs_cmd_in`, but running from inside `dir`, which is also used as
/// the isolated home. `dir` gets a `.git` directory so the project config
/// search never climbs out of it.
pub fn execrs_cmd_isolated(dir: &std::path::Path) -> Command {
    std::fs::create_dir_all(dir.join(".git")).expect("Failed to create .git marker");
    let mut cmd = execrs_cmd_in(dir);
    cmd.current_dir(dir);
    cmd
}
