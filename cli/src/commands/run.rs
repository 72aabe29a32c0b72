//! # execrs Run Command
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `execrs run`, which launches a command and forwards its stdout
//! and stderr to the console as they are produced.
//!
//! ## Architecture
//!
//! 1. Load configuration (`core::config`) for default working directory,
//!    directory mode and environment overrides.
//! 2. Merge command-line flags on top (flags win).
//! 3. Run the command on a blocking worker thread, since `Command::execute`
//!    blocks until the child exits and its output is drained.
//!
//! ## Usage
//!
//! ```bash
//! execrs run -- make test
//! execrs run -C ../other -e DEBUG=1 -- ./script.sh --flag
//! execrs run --no-stdout -- noisy-tool   # only stderr is shown
//! ```
//!
use super::parse_key_val;
use anyhow::Context;
use clap::Parser;
use execrs::common::process::{Command, DirectoryMode};
use execrs::core::config::{self, RunConfig};
use execrs::core::error::{ExecrsError, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for `execrs run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Run the command in DIR instead of the current directory.
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Environment override for the command (repeatable).
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    env: Vec<(String, String)>,

    /// Change this process's working directory for the run instead of
    /// passing the directory to the child.
    #[arg(long)]
    process_wide_chdir: bool,

    /// Discard the command's standard output.
    #[arg(long)]
    no_stdout: bool,

    /// Discard the command's standard error.
    #[arg(long)]
    no_stderr: bool,

    /// The program to run, followed by its arguments.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    command: Vec<String>,
}

/// Handler function for `execrs run`.
pub async fn handle_run(args: RunArgs) -> Result<()> {
    info!("Handling run command...");
    let cfg = config::load_config()?;
    let mut command = build_command(args, &cfg.run)?;
    debug!("Prepared command: {:?}", command);

    tokio::task::spawn_blocking(move || command.execute())
        .await
        .context("Command runner task failed")??;
    Ok(())
}

/// Combines parsed arguments with configured defaults into a `Command`
/// wired to the console sinks.
fn build_command(args: RunArgs, run_cfg: &RunConfig) -> Result<Command<'static>> {
    let mut words = args.command.into_iter();
    let program = words
        .next()
        .ok_or_else(|| ExecrsError::ArgumentParsing("no command given".to_string()))?;

    let mut command = Command::new(program, words);

    if let Some(dir) = args
        .dir
        .or_else(|| run_cfg.working_dir.as_ref().map(PathBuf::from))
    {
        command = command.working_dir(dir);
    }

    let mode = if args.process_wide_chdir {
        DirectoryMode::ProcessWide
    } else {
        run_cfg.directory_mode.unwrap_or_default()
    };
    command = command.directory_mode(mode);

    // Configured values first so command-line values replace them.
    command = command
        .envs(run_cfg.env.clone())
        .envs(args.env);

    if args.no_stdout {
        command = command.without_stdout();
    }
    if args.no_stderr {
        command = command.without_stderr();
    }
    Ok(command)
}
