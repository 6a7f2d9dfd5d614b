//! Fakes for the host capabilities, shared by unit tests

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{AliceError, AliceResult, Config, Context};
use crate::host::process::ProcessResult;
use crate::host::{
    FileSystem, LocalFs, PathEnvironment, PrivilegeProbe, ProcessInvocation, ProcessRunner,
};

/// Scripted process runner that records every call
#[derive(Default)]
pub struct FakeRunner {
    responses: Mutex<HashMap<String, VecDeque<ProcessResult>>>,
    calls: Mutex<Vec<ProcessInvocation>>,
    detached: Mutex<Vec<ProcessInvocation>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for the next run of `program`. Unscripted runs exit 0.
    pub fn respond(self, program: &str, result: ProcessResult) -> Self {
        self.responses
            .lock()
            .entry(program.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<ProcessInvocation> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn detached(&self) -> Vec<ProcessInvocation> {
        self.detached.lock().clone()
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> ProcessResult {
        self.calls.lock().push(invocation.clone());
        self.responses
            .lock()
            .get_mut(&invocation.program)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| ProcessResult::exited(0, ""))
    }

    fn spawn_detached(&self, invocation: &ProcessInvocation) -> AliceResult<()> {
        self.detached.lock().push(invocation.clone());
        Ok(())
    }
}

/// In-memory machine PATH
pub struct MemoryPath {
    value: Mutex<String>,
    separator: char,
    writes: AtomicUsize,
    deny_writes: bool,
}

impl MemoryPath {
    pub fn new(value: &str, separator: char) -> Self {
        Self {
            value: Mutex::new(value.to_string()),
            separator,
            writes: AtomicUsize::new(0),
            deny_writes: false,
        }
    }

    /// Every write fails as if the OS refused it
    pub fn denying(mut self) -> Self {
        self.deny_writes = true;
        self
    }

    pub fn value(&self) -> String {
        self.value.lock().clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PathEnvironment for MemoryPath {
    async fn read(&self) -> AliceResult<String> {
        Ok(self.value())
    }

    async fn write(&self, value: &str) -> AliceResult<()> {
        if self.deny_writes {
            return Err(AliceError::PathAccessDenied("write refused".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.value.lock() = value.to_string();
        Ok(())
    }

    fn separator(&self) -> char {
        self.separator
    }
}

/// Privilege probe with a fixed answer
pub struct FixedPrivilege(pub bool);

#[async_trait]
impl PrivilegeProbe for FixedPrivilege {
    async fn is_elevated(&self) -> bool {
        self.0
    }
}

/// Local filesystem that counts calls
#[derive(Default)]
pub struct CountingFs {
    calls: AtomicUsize,
}

impl CountingFs {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl FileSystem for CountingFs {
    fn is_dir(&self, path: &Path) -> bool {
        self.tick();
        LocalFs.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.tick();
        LocalFs.is_file(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.tick();
        LocalFs.create_dir_all(path)
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        self.tick();
        LocalFs.is_empty_dir(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        self.tick();
        LocalFs.copy(from, to)
    }

    fn append_line(&self, path: &Path, line: &str) -> io::Result<()> {
        self.tick();
        LocalFs.append_line(path, line)
    }
}

/// A fully faked host around a real scratch directory
pub struct TestHost {
    pub runner: Arc<FakeRunner>,
    pub path: Arc<MemoryPath>,
    pub fs: Arc<CountingFs>,
    pub elevated: bool,
    pub current_exe: PathBuf,
    pub config: Config,
}

impl TestHost {
    /// Host whose running executable is `current_exe`
    pub fn new(current_exe: impl Into<PathBuf>) -> Self {
        let mut config = Config::default();
        config.ui.exit_delay_ms = 0;
        Self {
            runner: Arc::new(FakeRunner::new()),
            path: Arc::new(MemoryPath::new("/usr/bin:/bin", ':')),
            fs: Arc::new(CountingFs::default()),
            elevated: true,
            current_exe: current_exe.into(),
            config,
        }
    }

    pub fn with_runner(mut self, runner: FakeRunner) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    pub fn with_path(mut self, path: MemoryPath) -> Self {
        self.path = Arc::new(path);
        self
    }

    pub fn not_elevated(mut self) -> Self {
        self.elevated = false;
        self
    }

    pub fn context(&self) -> Context {
        Context {
            config: self.config.clone(),
            runner: self.runner.clone(),
            path_env: self.path.clone(),
            fs: self.fs.clone(),
            privilege: Arc::new(FixedPrivilege(self.elevated)),
            current_exe: self.current_exe.clone(),
        }
    }
}

/// Write a fake executable (and nothing else) into `dir`
pub fn fake_exe(dir: &Path) -> PathBuf {
    let exe = dir.join(if cfg!(windows) { "alice.exe" } else { "alice" });
    std::fs::write(&exe, b"#!alice").unwrap();
    exe
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
