//! # Effective Environment (`common::process::environment`)
//!
//! File: cli/src/common/process/environment.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Builds the environment handed to a child process when the caller supplies
//! overrides. The rule is "inherit, then append": every variable of the calling
//! process comes first, followed by each override as its own entry.
//!
//! A key present in both places therefore appears twice in the list. The list
//! is applied to `std::process::Command` after `env_clear()`; the command's
//! environment is a map, so the later entry, the override, is what the child
//! sees. `execrs env -e KEY=VALUE` prints the raw list for inspection.
//!
use std::collections::BTreeMap;
use std::ffi::OsString;

/// Appends `overrides` after `base`, keeping duplicates.
///
/// Overrides are appended in key order.
pub fn append_overrides<I>(base: I, overrides: &BTreeMap<String, String>) -> Vec<(OsString, OsString)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut effective: Vec<(OsString, OsString)> = base.into_iter().collect();
    effective.extend(
        overrides
            .iter()
            .map(|(key, value)| (OsString::from(key), OsString::from(value))),
    );
    effective
}

/// The calling process's environment followed by `overrides`.
pub fn effective_environment(overrides: &BTreeMap<String, String>) -> Vec<(OsString, OsString)> {
    append_overrides(std::env::vars_os(), overrides)
}

/// Renders an environment list as `KEY=VALUE` lines, one entry per line.
pub fn render(environment: &[(OsString, OsString)]) -> String {
    let mut out = String::new();
    for (key, value) in environment {
        out.push_str(&key.to_string_lossy());
        out.push('=');
        out.push_str(&value.to_string_lossy());
        out.push('\n');
    }
    out
}
