//! # Stream Pump (`common::process::pump`)
//!
//! File: cli/src/common/process/pump.rs
//! Author: Christi Mahu
//!
//! Drains one child output stream into one sink. Each reader thread started by
//! `Command::execute` runs exactly one `pump` call, owning its pipe and
//! borrowing its sink, so the two readers share nothing.
//!
use super::sink::Sink;
use std::io::{ErrorKind, Read};
use tracing::{debug, trace};

/// Upper bound on a single read, and therefore on a single sink call.
pub const CHUNK_SIZE: usize = 1024;

/// Copies `stream` into `sink` until end of stream or a read error.
///
/// Reads block until data is available, so an idle child costs no CPU. Every
/// non-empty read becomes exactly one `write_chunk` call. `Interrupted` reads
/// are retried; any other error ends the pump the same way end of stream does.
///
/// Returns the number of bytes delivered.
pub fn pump<R, S>(mut stream: R, sink: &mut S, label: &str) -> u64
where
    R: Read,
    S: Sink + ?Sized,
{
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut delivered: u64 = 0;

    loop {
        match stream.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => {
                sink.write_chunk(&buffer[..read]);
                delivered += read as u64;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("Reader for {} stopped on error: {}", label, e);
                break;
            }
        }
    }

    trace!("Reader for {} finished after {} bytes", label, delivered);
    delivered
}
