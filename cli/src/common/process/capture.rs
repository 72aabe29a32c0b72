//! # Output Capture (`common::process::capture`)
//!
//! File: cli/src/common/process/capture.rs
//! Author: Christi Mahu
//!
//! Runs a command with accumulating sinks and hands back everything it wrote,
//! together with the outcome. The output is kept even when the run fails, so
//! callers can show what the process printed before exiting unsuccessfully.
//!
use super::command::Command;
use crate::core::error::ExecrsError;

/// Collected output of one run.
#[derive(Debug)]
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub result: Result<(), ExecrsError>,
}

impl Captured {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs `command`, replacing both of its sinks with in-memory buffers.
pub fn capture(command: Command<'_>) -> Captured {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let result = {
        let mut command = command
            .stdout(|chunk: &[u8]| stdout.extend_from_slice(chunk))
            .stderr(|chunk: &[u8]| stderr.extend_from_slice(chunk));
        command.execute()
    };
    Captured {
        stdout,
        stderr,
        result,
    }
}
