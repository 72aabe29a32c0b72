//! # execrs Library Root
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! execrs runs external processes and streams their standard output and
//! standard error, chunk by chunk, to caller-supplied sinks. The `execrs`
//! binary is a thin front end over this library.
//!
//! - `common::process`: The command runner (`Command`, `Sink`, `capture`).
//! - `core`: Configuration loading and error types.
//!
//! ```rust,no_run
//! use execrs::common::process::Command;
//!
//! let mut cmd = Command::new("sh", ["-c", "echo hello; echo oops >&2"]);
//! cmd.execute()?;
//! # Ok::<(), execrs::core::error::ExecrsError>(())
//! ```
//!
pub mod common;
pub mod core;
