//! External process invocation

use std::fmt;
use std::process::Stdio;
use async_trait::async_trait;
use tokio::process::Command;

use crate::core::{AliceError, AliceResult};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;
#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;

/// A single external call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    /// Executable name or path
    pub program: String,
    /// Arguments, passed without shell interpretation
    pub args: Vec<String>,
    /// Capture stdout/stderr instead of discarding them
    pub capture_output: bool,
}

impl ProcessInvocation {
    /// Create an invocation that captures output
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            capture_output: true,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Discard the child's output
    pub fn quiet(mut self) -> Self {
        self.capture_output = false;
        self
    }
}

impl fmt::Display for ProcessInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of running a process to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// False when the OS could not start the process at all
    pub started: bool,
    /// Exit code, -1 when not started or terminated by a signal
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Why the process could not be started
    pub start_error: Option<String>,
}

impl ProcessResult {
    /// A process that ran and exited with `code`
    pub fn exited(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            started: true,
            exit_code: code,
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    /// A process the OS refused to start
    pub fn not_started(reason: impl Into<String>) -> Self {
        Self {
            started: false,
            exit_code: -1,
            start_error: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Started and exited with code 0
    pub fn success(&self) -> bool {
        self.started && self.exit_code == 0
    }

    /// Captured stdout followed by stderr, trimmed
    pub fn output(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (false, false) => format!("{}\n{}", stdout, stderr),
            (false, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (true, true) => String::new(),
        }
    }

    /// Convert a start failure into a [`AliceError::Spawn`]
    pub fn ensure_started(self, program: &str) -> AliceResult<Self> {
        if self.started {
            return Ok(self);
        }
        Err(AliceError::Spawn {
            program: program.to_string(),
            reason: self
                .start_error
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

/// Runs external executables
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run to completion. Never fails: a start failure is reported through
    /// [`ProcessResult::started`].
    async fn run(&self, invocation: &ProcessInvocation) -> ProcessResult;

    /// Start a process and abandon it. Only a failure to start is reported.
    fn spawn_detached(&self, invocation: &ProcessInvocation) -> AliceResult<()>;
}

/// Runner backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> ProcessResult {
        tracing::debug!("Running: {}", invocation);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).stdin(Stdio::null());

        if invocation.capture_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        // `output()` forces piped streams, so quiet runs only wait for the status.
        let result = if invocation.capture_output {
            match cmd.output().await {
                Ok(out) => ProcessResult {
                    stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                    ..ProcessResult::exited(
                        out.status.code().unwrap_or(-1),
                        String::from_utf8_lossy(&out.stdout),
                    )
                },
                Err(e) => ProcessResult::not_started(e.to_string()),
            }
        } else {
            match cmd.status().await {
                Ok(status) => ProcessResult::exited(status.code().unwrap_or(-1), ""),
                Err(e) => ProcessResult::not_started(e.to_string()),
            }
        };

        tracing::debug!(
            "{} finished: started={} exit_code={}",
            invocation.program,
            result.started,
            result.exit_code
        );
        result
    }

    fn spawn_detached(&self, invocation: &ProcessInvocation) -> AliceResult<()> {
        tracing::debug!("Spawning detached: {}", invocation);

        let mut cmd = std::process::Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NO_WINDOW | DETACHED_PROCESS);
        }

        // The child is never waited on.
        cmd.spawn().map_err(|e| AliceError::Spawn {
            program: invocation.program.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
