//! # execrs Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Each top-level CLI command lives in its own module with an `Args` struct
//! and an async `handle_*` function called from `main.rs`. Helpers shared by
//! several commands sit here.
//!
use execrs::core::config::validate_env_key;

/// `execrs env`: prints the effective environment a child would receive.
pub mod environment;
/// `execrs run`: runs a command, streaming its output to the console.
pub mod run;

/// Clap value parser for `KEY=VALUE` environment overrides.
///
/// Only the first `=` separates key from value, so values may contain `=`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{}'", s))?;
    validate_env_key(key).map_err(|e| e.to_string())?;
    Ok((key.to_string(), value.to_string()))
}
