//! # execrs Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module runs external processes and streams their output, chunk by
//! chunk, to caller-supplied sinks while the process is still running.
//!
//! ## Architecture
//!
//! - **`command`**: `Command`, the builder-style specification, and
//!   `Command::execute`, which launches the child, drains both output streams
//!   on scoped reader threads, waits for exit and joins the readers.
//! - **`sink`**: The `Sink` trait (any `FnMut(&[u8]) + Send` closure qualifies)
//!   and the default console sinks.
//! - **`pump`**: The read loop each reader thread runs.
//! - **`environment`**: The "inherit, then append overrides" environment.
//! - **`workdir`**: Working-directory overrides, either passed to the child
//!   (`DirectoryMode::Explicit`) or applied process-wide with a restoring guard.
//! - **`capture`**: Convenience wrapper that collects both streams in memory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use execrs::common::process::{capture, Command};
//! use execrs::core::error::ExecrsError;
//!
//! # fn run_example() -> Result<(), ExecrsError> {
//! // Stream `cargo build` output straight to the console, running inside ./my-project.
//! Command::new("cargo", ["build"]).working_dir("./my-project").execute()?;
//!
//! // Collect `git status` output instead.
//! let captured = capture(Command::bare("git", ["status", "--short"]));
//! captured.result?;
//! println!("{}", String::from_utf8_lossy(&captured.stdout));
//! # Ok(())
//! # }
//! ```
//!

/// In-memory capture of both output streams.
pub mod capture;
/// The command specification and the `execute` operation.
pub mod command;
/// Effective environment construction.
pub mod environment;
/// The per-stream read loop.
pub mod pump;
/// Output sinks.
pub mod sink;
/// Working-directory overrides.
pub mod workdir;

pub use capture::{capture, Captured};
pub use command::Command;
pub use sink::{Sink, StderrSink, StdoutSink};
pub use workdir::DirectoryMode;
