//! # Working Directory Handling (`common::process::workdir`)
//!
//! File: cli/src/common/process/workdir.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A command may run in a directory other than the caller's. There are two
//! ways to get there, selected by `DirectoryMode`:
//!
//! - **`Explicit`** (default): the directory is checked up front and handed to
//!   the child's launch configuration. This process's working directory is
//!   never touched, so concurrent runs cannot interfere with each other.
//! - **`ProcessWide`** (legacy): this process changes into the directory for
//!   the length of the run and changes back afterwards. `WorkdirGuard` does
//!   the restore on drop, so every exit path restores exactly once. Guards are
//!   serialized by a process-global lock; two process-wide runs never overlap.
//!   Code that reads the working directory outside of `execute` can still
//!   observe the temporary change.
//!
use crate::core::error::ExecrsError;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread::{self, ThreadId};
use tracing::{debug, warn};

/// How a working-directory override is applied.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DirectoryMode {
    /// Pass the directory to the child only.
    #[default]
    Explicit,
    /// Change this process's working directory for the duration of the run.
    ///
    /// Runs in this mode hold a process-global lock from the directory change
    /// until the output readers are joined. A nested process-wide run started
    /// from the same run (from its calling thread or from inside one of its
    /// sinks) cannot get that lock and fails with
    /// `ExecrsError::DirectoryChange` instead of waiting forever.
    ProcessWide,
}

/// Serializes process-wide directory changes.
static PROCESS_CWD: Mutex<()> = Mutex::new(());

/// Threads taking part in the process-wide run that currently holds
/// `PROCESS_CWD`: the calling thread plus its reader threads.
static SESSION_THREADS: Mutex<Vec<ThreadId>> = Mutex::new(Vec::new());

fn session_threads() -> MutexGuard<'static, Vec<ThreadId>> {
    SESSION_THREADS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn change_error(dir: &Path, source: io::Error) -> ExecrsError {
    ExecrsError::DirectoryChange {
        path: dir.to_path_buf(),
        source,
    }
}

/// Verifies that `dir` is a directory a process could change into.
///
/// Used by `Explicit` mode so a bad override is reported as
/// `ExecrsError::DirectoryChange` before anything is launched, and again
/// after a failed launch to tell a vanished directory from a bad program.
pub fn check_directory(dir: &Path) -> Result<(), ExecrsError> {
    // Resolving `dir/.` needs search permission on `dir`, same as chdir.
    // Read permission is irrelevant.
    let metadata = std::fs::metadata(dir.join(".")).map_err(|source| change_error(dir, source))?;
    if !metadata.is_dir() {
        return Err(change_error(dir, io::Error::other("not a directory")));
    }
    Ok(())
}

/// Scoped change of this process's working directory.
///
/// Holds the global lock for its whole lifetime and restores the previous
/// directory when dropped.
#[derive(Debug)]
pub struct WorkdirGuard {
    previous: PathBuf,
    owner: ThreadId,
    _lock: MutexGuard<'static, ()>,
}

impl WorkdirGuard {
    /// Captures the current directory and changes into `dir`.
    ///
    /// If the current directory cannot be determined it could not be
    /// restored either, so that is reported as a failed change too.
    pub fn enter(dir: &Path) -> Result<Self, ExecrsError> {
        let owner = thread::current().id();
        if session_threads().contains(&owner) {
            return Err(change_error(
                dir,
                io::Error::other("a process-wide directory change is already active for this run"),
            ));
        }

        // A panic while holding the lock cannot leave the directory changed
        // (the guard restores on unwind), so a poisoned lock is still usable.
        let lock = PROCESS_CWD
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let previous = std::env::current_dir().map_err(|source| change_error(dir, source))?;
        std::env::set_current_dir(dir).map_err(|source| change_error(dir, source))?;
        debug!(
            "Changed working directory from {} to {}",
            previous.display(),
            dir.display()
        );

        session_threads().push(owner);
        Ok(Self {
            previous,
            owner,
            _lock: lock,
        })
    }

    /// The directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// Marks the current thread as part of this run until the returned value
    /// is dropped. Reader threads call this so a sink that starts another
    /// process-wide run is refused instead of deadlocking.
    pub fn enlist_current_thread(&self) -> SessionMember {
        let id = thread::current().id();
        session_threads().push(id);
        SessionMember { id }
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        match std::env::set_current_dir(&self.previous) {
            Ok(()) => debug!("Restored working directory to {}", self.previous.display()),
            Err(e) => warn!(
                "Failed to restore working directory to {}: {}",
                self.previous.display(),
                e
            ),
        }
        remove_thread(self.owner);
    }
}

/// Membership of a thread in the active process-wide run.
#[derive(Debug)]
pub struct SessionMember {
    id: ThreadId,
}

impl Drop for SessionMember {
    fn drop(&mut self) {
        remove_thread(self.id);
    }
}

fn remove_thread(id: ThreadId) {
    let mut threads = session_threads();
    if let Some(pos) = threads.iter().position(|t| *t == id) {
        threads.swap_remove(pos);
    }
}
