//! # Output Sinks (`common::process::sink`)
//!
//! File: cli/src/common/process/sink.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A sink is whatever consumes the bytes a child process writes to one of its
//! output streams. The runner calls a sink once per successful read, with
//! exactly the bytes that read returned, from a reader thread that runs
//! alongside the caller.
//!
//! Any `FnMut(&[u8]) + Send` closure is a sink, so most callers never name the
//! trait:
//!
//! ```rust,no_run
//! use execrs::common::process::Command;
//!
//! let mut lines = Vec::new();
//! let mut cmd = Command::bare("echo", ["hi"]).stdout(|chunk: &[u8]| lines.extend_from_slice(chunk));
//! cmd.execute().unwrap();
//! ```
//!
//! `StdoutSink` and `StderrSink` forward to this process's own streams and are
//! what `Command::new` wires up by default.
//!
use std::io::{self, Write};
use tracing::trace;

/// Consumer of output chunks produced by a child process.
///
/// Chunks are never empty. Sinks are called from a reader thread, hence `Send`.
pub trait Sink: Send {
    fn write_chunk(&mut self, chunk: &[u8]);
}

impl<F> Sink for F
where
    F: FnMut(&[u8]) + Send,
{
    fn write_chunk(&mut self, chunk: &[u8]) {
        self(chunk)
    }
}

/// Forwards chunks to this process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_chunk(&mut self, chunk: &[u8]) {
        forward(&mut io::stdout().lock(), chunk, "stdout");
    }
}

/// Forwards chunks to this process's standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write_chunk(&mut self, chunk: &[u8]) {
        forward(&mut io::stderr().lock(), chunk, "stderr");
    }
}

/// Writes and flushes one chunk. A sink has no way to report failure, so a
/// closed console (e.g. a broken pipe) only shows up in the trace log.
fn forward<W: Write>(out: &mut W, chunk: &[u8], name: &str) {
    if let Err(e) = out.write_all(chunk).and_then(|()| out.flush()) {
        trace!("Dropping {} bytes destined for {}: {}", chunk.len(), name, e);
    }
}
