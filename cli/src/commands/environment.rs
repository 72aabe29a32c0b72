//! # execrs Env Command
//!
//! File: cli/src/commands/environment.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `execrs env`, which prints the environment a child launched by
//! `execrs run` would be given: the current environment, followed by the
//! configured and command-line overrides. A key overridden here is printed
//! twice; the child sees the last value.
//!
//! ```bash
//! execrs env -e HOME=/tmp/fake | grep ^HOME=
//! ```
//!
use super::parse_key_val;
use clap::Parser;
use execrs::common::process::environment::{effective_environment, render};
use execrs::core::config;
use execrs::core::error::Result;
use std::collections::BTreeMap;
use std::io::Write;

/// Arguments for `execrs env`.
#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Environment override to apply (repeatable).
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    env: Vec<(String, String)>,
}

/// Handler function for `execrs env`.
pub async fn handle_env(args: EnvArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let overrides = collect_overrides(cfg.run.env, args.env);
    let rendered = render(&effective_environment(&overrides));
    std::io::stdout().lock().write_all(rendered.as_bytes())?;
    Ok(())
}

/// Configured overrides, then command-line overrides on top.
fn collect_overrides<C>(configured: C, flags: Vec<(String, String)>) -> BTreeMap<String, String>
where
    C: IntoIterator<Item = (String, String)>,
{
    let mut overrides: BTreeMap<String, String> = configured.into_iter().collect();
    overrides.extend(flags);
    overrides
}
