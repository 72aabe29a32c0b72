//! # execrs Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout execrs. Process
//! execution failures are modelled as a typed enum so callers can tell a
//! setup failure apart from a launch failure or an abnormal exit.
//!
//! ## Architecture
//!
//! The error system consists of three parts:
//! - `ExecrsError`: A `thiserror` enum covering process execution and the
//!   configuration/argument layers around it.
//! - `WaitFailure`: The cause carried by `ExecrsError::Wait`, either an I/O
//!   error from waiting or a non-success exit status.
//! - `Result<T>`: A type alias for `anyhow::Result<T>` used by application code.
//!
//! The process-level taxonomy:
//! - `DirectoryChange`: the working-directory override could not be applied; nothing was launched.
//! - `Start`: the process could not be launched.
//! - `Wait`: the process launched but exited abnormally, or waiting on it failed.
//!   Output produced before the failure has already been delivered to the sinks.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use execrs::common::process::Command;
//! use execrs::core::error::ExecrsError;
//!
//! let mut cmd = Command::new("false", Vec::<String>::new());
//! match cmd.execute() {
//!     Ok(()) => println!("ok"),
//!     Err(ExecrsError::Wait { program, source }) => eprintln!("{program}: {source}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error type for execrs.
#[derive(Error, Debug)]
pub enum ExecrsError {
    #[error("Failed to change working directory to '{}': {source}", path.display())]
    DirectoryChange {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start '{program}': {source}")]
    Start {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Command '{program}' failed: {source}")]
    Wait {
        program: String,
        #[source]
        source: WaitFailure,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Why waiting on a launched process was reported as a failure.
#[derive(Error, Debug)]
pub enum WaitFailure {
    /// The wait call itself failed.
    #[error("wait failed: {0}")]
    Io(#[from] io::Error),

    /// The process ran to completion but did not exit successfully.
    #[error("exited with {0}")]
    Status(ExitStatus),
}

/// Type alias for Result using anyhow::Error for application-level code.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = ExecrsError::Config("Missing setting 'foo'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'foo'"
        );

        let dir_err = ExecrsError::DirectoryChange {
            path: PathBuf::from("/no/such/dir"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            dir_err.to_string(),
            "Failed to change working directory to '/no/such/dir': not found"
        );

        let start_err = ExecrsError::Start {
            program: "nope".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            start_err.to_string(),
            "Failed to start 'nope': No such file or directory"
        );
    }

    #[test]
    fn test_error_sources_are_chained() {
        use std::error::Error as _;

        let err = ExecrsError::Wait {
            program: "sh".into(),
            source: WaitFailure::Io(io::Error::new(io::ErrorKind::Other, "boom")),
        };
        let source = err.source().expect("Wait should expose its cause");
        assert_eq!(source.to_string(), "wait failed: boom");
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_status_display() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait status 3 << 8 encodes `exit(3)`.
        let failure = WaitFailure::Status(ExitStatus::from_raw(3 << 8));
        assert_eq!(failure.to_string(), "exited with exit status: 3");
    }
}
