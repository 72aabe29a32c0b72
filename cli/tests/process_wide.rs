//! # Process-Wide Working Directory Tests
//!
//! File: cli/tests/process_wide.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `DirectoryMode::ProcessWide` changes the working directory of the whole
//! process, which would disturb any test running in parallel with it. These
//! tests live in their own binary and run as a single `#[test]`, so nothing
//! else observes the temporary directory changes.
//!
#![cfg(unix)]

use execrs::common::process::workdir::WorkdirGuard;
use execrs::common::process::{Command, DirectoryMode};
use execrs::core::error::ExecrsError;
use std::env;
use std::fs::{self, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use tempfile::tempdir;

fn legacy<'a>(script: &str, dir: &Path) -> Command<'a> {
    Command::bare("sh", ["-c", script])
        .working_dir(dir)
        .directory_mode(DirectoryMode::ProcessWide)
}

#[test]
fn test_process_wide_directory_lifecycle() {
    let original = env::current_dir().unwrap();
    let target = tempdir().unwrap();
    let target_real = target.path().canonicalize().unwrap();

    // The child runs inside the override, and we are back afterwards.
    let mut out = Vec::new();
    legacy("pwd -P", target.path())
        .stdout(|c: &[u8]| out.extend_from_slice(c))
        .execute()
        .unwrap();
    assert_eq!(
        String::from_utf8_lossy(&out).trim_end(),
        target_real.to_string_lossy()
    );
    assert_eq!(env::current_dir().unwrap(), original);

    // Restored when the child exits unsuccessfully.
    let err = legacy("exit 9", target.path()).execute().unwrap_err();
    assert!(matches!(err, ExecrsError::Wait { .. }));
    assert_eq!(env::current_dir().unwrap(), original);

    // Restored when the program cannot be started.
    let err = Command::bare("execrs-definitely-not-a-real-program", Vec::<String>::new())
        .working_dir(target.path())
        .directory_mode(DirectoryMode::ProcessWide)
        .execute()
        .unwrap_err();
    assert!(matches!(err, ExecrsError::Start { .. }));
    assert_eq!(env::current_dir().unwrap(), original);

    // A bad override fails before anything runs and leaves the directory alone.
    let missing = target.path().join("missing");
    let calls = AtomicUsize::new(0);
    let err = legacy("echo nope", &missing)
        .stdout(|_: &[u8]| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
        .execute()
        .unwrap_err();
    assert!(matches!(err, ExecrsError::DirectoryChange { ref path, .. } if *path == missing));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(env::current_dir().unwrap(), original);

    // The guard itself.
    {
        let guard = WorkdirGuard::enter(target.path()).unwrap();
        assert_eq!(guard.previous(), original.as_path());
        assert_eq!(env::current_dir().unwrap().canonicalize().unwrap(), target_real);
    }
    assert_eq!(env::current_dir().unwrap(), original);

    // A nested guard on the same thread is refused instead of deadlocking.
    {
        let _outer = WorkdirGuard::enter(target.path()).unwrap();
        let inner = WorkdirGuard::enter(original.as_path());
        assert!(matches!(inner, Err(ExecrsError::DirectoryChange { .. })));
    }
    assert_eq!(env::current_dir().unwrap(), original);

    // So is a process-wide run started from a sink; the outer run still completes.
    let inner_dir = tempdir().unwrap();
    let mut nested = None;
    legacy("echo outer", target.path())
        .stdout(|_: &[u8]| {
            if nested.is_none() {
                nested = Some(legacy("echo inner", inner_dir.path()).execute());
            }
        })
        .execute()
        .unwrap();
    assert!(
        matches!(nested, Some(Err(ExecrsError::DirectoryChange { .. }))),
        "expected a refused nested run, got {:?}",
        nested
    );
    assert_eq!(env::current_dir().unwrap(), original);

    // Entering a directory needs search permission, not read permission.
    let search_only = target.path().join("search-only");
    let read_only = target.path().join("read-only");
    fs::create_dir(&search_only).unwrap();
    fs::create_dir(&read_only).unwrap();
    fs::set_permissions(&search_only, Permissions::from_mode(0o311)).unwrap();
    fs::set_permissions(&read_only, Permissions::from_mode(0o644)).unwrap();
    // Root bypasses permission bits, so the read-only case is only checked otherwise.
    let enforced = fs::read_dir(&search_only).is_err();

    let mut seen = Vec::new();
    let searchable = legacy("pwd -P", &search_only)
        .stdout(|c: &[u8]| seen.extend_from_slice(c))
        .execute();
    let unsearchable = legacy("echo nope", &read_only).execute();

    fs::set_permissions(&search_only, Permissions::from_mode(0o755)).unwrap();
    fs::set_permissions(&read_only, Permissions::from_mode(0o755)).unwrap();

    assert!(searchable.is_ok(), "unexpected error: {:?}", searchable);
    assert_eq!(
        String::from_utf8_lossy(&seen).trim_end(),
        search_only.canonicalize().unwrap().to_string_lossy()
    );
    if enforced {
        assert!(
            matches!(unsearchable, Err(ExecrsError::DirectoryChange { ref path, .. }) if *path == read_only),
            "expected DirectoryChange, got {:?}",
            unsearchable
        );
    } else {
        eprintln!("skipping read-only directory check: permissions are not enforced");
    }
    assert_eq!(env::current_dir().unwrap(), original);

    // Overlapping process-wide runs are serialized and each sees its own directory.
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    let results: Vec<(String, String)> = thread::scope(|scope| {
        let handles: Vec<_> = [first.path(), second.path()]
            .into_iter()
            .map(|dir| {
                scope.spawn(move || {
                    let mut seen = Vec::new();
                    legacy("sleep 0.1; pwd -P", dir)
                        .stdout(|c: &[u8]| seen.extend_from_slice(c))
                        .execute()
                        .unwrap();
                    (
                        String::from_utf8_lossy(&seen).trim_end().to_string(),
                        dir.canonicalize().unwrap().to_string_lossy().into_owned(),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (seen, expected) in results {
        assert_eq!(seen, expected);
    }
    assert_eq!(env::current_dir().unwrap(), original);
}
