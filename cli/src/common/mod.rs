//! # execrs Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared utilities used by the CLI command handlers. Command-specific logic
//! lives in the binary's `commands` module; infrastructure such as errors and
//! configuration lives in `core`.
//!
//! - **`process`**: Executing external commands and streaming their output to sinks.
//!

/// Utilities for executing external processes and streaming their output.
pub mod process;
