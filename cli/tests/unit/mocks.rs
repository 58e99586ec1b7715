//! Shared mock infrastructure for unit tests.
//!
//! `MockCommandRunner` records every `(program, args)` call and answers from
//! a table of canned outputs keyed by command-line prefix. `MemFs` is an
//! in-memory `LocalFs` that also tracks which files were written privately.

#![allow(clippy::expect_used, dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use avtofix_deploy::application::ports::{CommandRunner, LocalFs, ProgressReporter};

// ── Output helpers ────────────────────────────────────────────────────────────

/// Build an `ExitStatus` from a logical exit code.
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15.
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── MockCommandRunner ─────────────────────────────────────────────────────────

/// A `CommandRunner` that records every call.
///
/// Cloning shares the call log and the response table.
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    responses: Arc<Mutex<Vec<(String, Output)>>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every command line starting with `prefix` with `output`.
    /// Earlier registrations win.
    #[must_use]
    pub fn respond(self, prefix: &str, output: Output) -> Self {
        self.responses
            .lock()
            .expect("mutex poisoned")
            .push((prefix.to_string(), output));
        self
    }

    /// Snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    /// Recorded calls rendered as single command lines.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|(p, a)| std::iter::once(p).chain(a).collect::<Vec<_>>().join(" "))
            .collect()
    }

    /// Whether any recorded command line contains `needle`.
    pub fn ran(&self, needle: &str) -> bool {
        self.command_lines().iter().any(|l| l.contains(needle))
    }

    fn answer(&self, program: &str, args: &[&str]) -> Output {
        self.calls.lock().expect("mutex poisoned").push((
            program.to_string(),
            args.iter().map(ToString::to_string).collect(),
        ));
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.responses
            .lock()
            .expect("mutex poisoned")
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map_or_else(|| ok_output(b""), |(_, out)| out.clone())
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        Ok(self.answer(program, args))
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Output> {
        Ok(self.answer(program, args))
    }
}

// ── MemFs ─────────────────────────────────────────────────────────────────────

/// In-memory filesystem.
#[derive(Default)]
pub struct MemFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    private: Mutex<BTreeSet<PathBuf>>,
    writes: Mutex<Vec<PathBuf>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (its parent directories count as existing).
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.files
            .lock()
            .expect("mutex poisoned")
            .insert(path, content.to_string());
        self
    }

    /// Seed a directory.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.dirs.lock().expect("mutex poisoned").insert(path);
        self
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .lock()
            .expect("mutex poisoned")
            .get(path.as_ref())
            .cloned()
    }

    pub fn is_private(&self, path: impl AsRef<Path>) -> bool {
        self.private
            .lock()
            .expect("mutex poisoned")
            .contains(path.as_ref())
    }

    /// Number of writes (private or not) that hit `path`.
    pub fn write_count(&self, path: impl AsRef<Path>) -> usize {
        self.writes
            .lock()
            .expect("mutex poisoned")
            .iter()
            .filter(|p| p.as_path() == path.as_ref())
            .count()
    }

    fn add_parents(&self, path: &Path) {
        let mut dirs = self.dirs.lock().expect("mutex poisoned");
        for ancestor in path.ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
    }

    fn store(&self, path: &Path, content: &str) {
        self.add_parents(path);
        self.files
            .lock()
            .expect("mutex poisoned")
            .insert(path.to_path_buf(), content.to_string());
        self.writes
            .lock()
            .expect("mutex poisoned")
            .push(path.to_path_buf());
    }
}

impl LocalFs for MemFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.lock().expect("mutex poisoned").contains_key(path)
            || self.dirs.lock().expect("mutex poisoned").contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.add_parents(path);
        self.dirs
            .lock()
            .expect("mutex poisoned")
            .insert(path.to_path_buf());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.file(path))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.store(path, content);
        Ok(())
    }

    fn write_private(&self, path: &Path, content: &str) -> Result<()> {
        self.private
            .lock()
            .expect("mutex poisoned")
            .insert(path.to_path_buf());
        self.store(path, content);
        Ok(())
    }

    fn restrict_permissions(&self, path: &Path) -> Result<()> {
        self.private
            .lock()
            .expect("mutex poisoned")
            .insert(path.to_path_buf());
        Ok(())
    }
}

// ── RecordingReporter ─────────────────────────────────────────────────────────

/// `ProgressReporter` that keeps every message, tagged by kind.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self, kind: &str) -> Vec<String> {
        self.events
            .lock()
            .expect("mutex poisoned")
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, kind: &'static str, message: &str) {
        self.events
            .lock()
            .expect("mutex poisoned")
            .push((kind, message.to_string()));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.push("step", message);
    }
    fn success(&self, message: &str) {
        self.push("success", message);
    }
    fn warn(&self, message: &str) {
        self.push("warn", message);
    }
    fn info(&self, message: &str) {
        self.push("info", message);
    }
}
