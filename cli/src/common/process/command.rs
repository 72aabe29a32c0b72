//! # Command Runner (`common::process::command`)
//!
//! File: cli/src/common/process/command.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `Command` describes one external process to run: program, arguments,
//! optional working directory, environment overrides, and one sink per output
//! stream. `Command::execute` runs it to completion on the calling thread while
//! two scoped reader threads drain stdout and stderr into their sinks.
//!
//! ## Execution Flow
//!
//! 1. Apply the working-directory override, if any (see `workdir`). A bad
//!    directory fails with `ExecrsError::DirectoryChange` before anything runs.
//! 2. Build the effective environment when overrides are present (see `environment`).
//! 3. Pipe each stream that has a sink; streams without a sink go to the null device.
//! 4. Spawn the child. Failure is `ExecrsError::Start`, unless an explicit
//!    working directory has become unusable in the meantime, which is still
//!    `ExecrsError::DirectoryChange`.
//! 5. Start one reader per piped stream and wait for the child on this thread.
//!    If a reader thread cannot be created the child is killed and reaped, and
//!    the run fails with `ExecrsError::Start`. A failed wait or unsuccessful
//!    exit is `ExecrsError::Wait`.
//! 6. Join both readers. By the time `execute` returns every byte the child
//!    wrote has been handed to its sink.
//! 7. Restore the working directory if it was changed process-wide.
//!
//! No ordering is guaranteed between stdout and stderr chunks. Sinks are
//! called from the reader threads; if both touch the same state the caller
//! must synchronize it.
//!
use super::environment::effective_environment;
use super::pump::pump;
use super::sink::{Sink, StderrSink, StdoutSink};
use super::workdir::{check_directory, DirectoryMode, WorkdirGuard};
use crate::core::error::{ExecrsError, WaitFailure};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};
use std::thread;
use tracing::debug;

/// Specification of an external process and where its output goes.
pub struct Command<'a> {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    directory_mode: DirectoryMode,
    env: BTreeMap<String, String>,
    stdout: Option<Box<dyn Sink + 'a>>,
    stderr: Option<Box<dyn Sink + 'a>>,
}

impl<'a> Command<'a> {
    /// Creates a command whose output is forwarded to this process's stdout and stderr.
    pub fn new<S, I>(program: impl Into<String>, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self::bare(program, args)
            .stdout(StdoutSink)
            .stderr(StderrSink)
    }

    /// Creates a command with no sinks; both streams are discarded until sinks are set.
    pub fn bare<S, I>(program: impl Into<String>, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            directory_mode: DirectoryMode::default(),
            env: BTreeMap::new(),
            stdout: None,
            stderr: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<S, I>(mut self, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the command in `dir`. An empty path means "no override".
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn directory_mode(mut self, mode: DirectoryMode) -> Self {
        self.directory_mode = mode;
        self
    }

    /// Adds an environment override. Setting the same key again replaces the value.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn stdout(mut self, sink: impl Sink + 'a) -> Self {
        self.stdout = Some(Box::new(sink));
        self
    }

    pub fn stderr(mut self, sink: impl Sink + 'a) -> Self {
        self.stderr = Some(Box::new(sink));
        self
    }

    /// Discards standard output instead of reading it.
    pub fn without_stdout(mut self) -> Self {
        self.stdout = None;
        self
    }

    /// Discards standard error instead of reading it.
    pub fn without_stderr(mut self) -> Self {
        self.stderr = None;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The working-directory override, ignoring an empty path.
    pub fn get_working_dir(&self) -> Option<&Path> {
        self.working_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    pub fn get_directory_mode(&self) -> DirectoryMode {
        self.directory_mode
    }

    pub fn get_envs(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Runs the command to completion.
    ///
    /// Blocks until the child has exited and both output streams are fully
    /// drained into their sinks.
    ///
    /// # Errors
    ///
    /// - `ExecrsError::DirectoryChange` if the working-directory override
    ///   cannot be applied. Nothing is launched and no sink is called.
    /// - `ExecrsError::Start` if the process cannot be launched.
    /// - `ExecrsError::Wait` if waiting fails or the process exits unsuccessfully.
    ///
    /// # Panics
    ///
    /// A panic inside a sink is propagated once both readers have finished.
    pub fn execute(&mut self) -> Result<(), ExecrsError> {
        let working_dir = self.get_working_dir().map(Path::to_path_buf);

        // Declared before anything is spawned so it drops last, after the
        // readers are joined.
        let restore = match (&working_dir, self.directory_mode) {
            (Some(dir), DirectoryMode::ProcessWide) => Some(WorkdirGuard::enter(dir)?),
            (Some(dir), DirectoryMode::Explicit) => {
                check_directory(dir)?;
                None
            }
            (None, _) => None,
        };

        let mut child_cmd = std::process::Command::new(&self.program);
        child_cmd.args(&self.args).stdin(Stdio::null());

        if let (Some(dir), DirectoryMode::Explicit) = (&working_dir, self.directory_mode) {
            child_cmd.current_dir(dir);
        }

        if !self.env.is_empty() {
            // Later entries win, so overrides shadow inherited values.
            child_cmd.env_clear().envs(effective_environment(&self.env));
        }

        child_cmd.stdout(if self.stdout.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        child_cmd.stderr(if self.stderr.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });

        debug!("Executing command: {} {:?}", self.program, self.args);
        if let Some(dir) = &working_dir {
            debug!(
                "Working directory: {} ({:?})",
                dir.display(),
                self.directory_mode
            );
        }

        let explicit_dir = match self.directory_mode {
            DirectoryMode::Explicit => working_dir.as_deref(),
            DirectoryMode::ProcessWide => None,
        };
        let mut child = match child_cmd.spawn() {
            Ok(child) => child,
            Err(source) => return Err(start_failure(&self.program, explicit_dir, source)),
        };
        debug!("Spawned '{}' with pid {}", self.program, child.id());

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let stdout_sink = self.stdout.as_deref_mut();
        let stderr_sink = self.stderr.as_deref_mut();
        let program = self.program.as_str();
        let session = restore.as_ref();

        // Leaving the scope joins both readers, whatever the wait returned.
        let status = thread::scope(|scope| {
            let readers = spawn_reader(scope, "stdout", stdout_pipe, stdout_sink, session)
                .and_then(|()| spawn_reader(scope, "stderr", stderr_pipe, stderr_sink, session));
            if let Err(source) = readers {
                return Err(abandon_child(&mut child, program, source));
            }
            child.wait().map_err(|e| ExecrsError::Wait {
                program: program.to_string(),
                source: WaitFailure::Io(e),
            })
        })?;

        if status.success() {
            debug!("Command '{}' completed successfully.", program);
            Ok(())
        } else {
            debug!("Command '{}' exited with {}", program, status);
            Err(ExecrsError::Wait {
                program: program.to_string(),
                source: WaitFailure::Status(status),
            })
        }
    }
}

/// Classifies a failed launch.
///
/// An explicit working directory is checked again: it may have been removed
/// or lost its search permission after the up-front check.
fn start_failure(program: &str, explicit_dir: Option<&Path>, source: io::Error) -> ExecrsError {
    if let Some(dir) = explicit_dir {
        if let Err(dir_err) = check_directory(dir) {
            debug!(
                "Launching '{}' failed ({}); working directory {} is unusable",
                program,
                source,
                dir.display()
            );
            return dir_err;
        }
    }
    ExecrsError::Start {
        program: program.to_string(),
        source,
    }
}

/// Starts a named reader thread draining `pipe` into `sink`.
///
/// Does nothing when the stream has no pipe or no sink. During a process-wide
/// run the reader enlists in the run, so its sink cannot start a nested one.
fn spawn_reader<'scope, 'env, R, S>(
    scope: &'scope thread::Scope<'scope, 'env>,
    label: &'static str,
    pipe: Option<R>,
    sink: Option<&'scope mut S>,
    session: Option<&'scope WorkdirGuard>,
) -> io::Result<()>
where
    R: Read + Send + 'scope,
    S: Sink + ?Sized + 'scope,
{
    let (Some(pipe), Some(sink)) = (pipe, sink) else {
        return Ok(());
    };
    thread::Builder::new()
        .name(format!("execrs-{label}"))
        .spawn_scoped(scope, move || {
            let _member = session.map(WorkdirGuard::enlist_current_thread);
            pump(pipe, sink, label)
        })?;
    Ok(())
}

/// Kills and reaps a child whose output can no longer be read.
fn abandon_child(child: &mut Child, program: &str, source: io::Error) -> ExecrsError {
    debug!("Could not start an output reader for '{}': {}", program, source);
    if let Err(e) = child.kill() {
        debug!("Failed to kill '{}': {}", program, e);
    }
    if let Err(e) = child.wait() {
        debug!("Failed to reap '{}': {}", program, e);
    }
    ExecrsError::Start {
        program: program.to_string(),
        source,
    }
}

impl fmt::Debug for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("working_dir", &self.working_dir)
            .field("directory_mode", &self.directory_mode)
            .field("env", &self.env)
            .field("stdout", &self.stdout.is_some())
            .field("stderr", &self.stderr.is_some())
            .finish()
    }
}
