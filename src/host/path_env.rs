//! Machine-wide executable search path management
//!
//! [`PathManager`] keeps PATH mutation idempotent on top of a
//! [`PathEnvironment`] backend that reads and writes the raw value.
//! On Windows the backend is the `Machine` scope of the `Path` variable; on
//! POSIX hosts it is a managed profile script sourced by login shells.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;

use crate::core::{AliceError, AliceResult};
use crate::host::process::{ProcessInvocation, ProcessResult, ProcessRunner};

/// Raw access to the machine-wide PATH value
#[async_trait]
pub trait PathEnvironment: Send + Sync {
    /// Current value
    async fn read(&self) -> AliceResult<String>;

    /// Replace the value
    async fn write(&self, value: &str) -> AliceResult<()>;

    /// Path-list separator for this backend
    fn separator(&self) -> char;
}

/// Outcome of a PATH mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathChange {
    Added,
    AlreadyPresent,
    Removed,
    NotPresent,
}

/// Idempotent PATH operations
pub struct PathManager<'a> {
    env: &'a dyn PathEnvironment,
}

impl<'a> PathManager<'a> {
    pub fn new(env: &'a dyn PathEnvironment) -> Self {
        Self { env }
    }

    /// Exact membership of `dir` in the PATH list
    pub async fn is_on_path(&self, dir: &str) -> AliceResult<bool> {
        let value = self.env.read().await?;
        let found = split_entries(&value, self.env.separator()).any(|entry| entry == dir);
        Ok(found)
    }

    /// Append `dir` unless it is already present
    pub async fn add_to_path(&self, dir: &str) -> AliceResult<PathChange> {
        let value = self.env.read().await?;
        let sep = self.env.separator();
        if split_entries(&value, sep).any(|entry| entry == dir) {
            return Ok(PathChange::AlreadyPresent);
        }

        self.env.write(&with_entry(&value, dir, sep)).await?;
        tracing::info!("Added {} to the machine PATH", dir);
        Ok(PathChange::Added)
    }

    /// Remove every exact occurrence of `dir`
    pub async fn remove_from_path(&self, dir: &str) -> AliceResult<PathChange> {
        let value = self.env.read().await?;
        let sep = self.env.separator();
        if !split_entries(&value, sep).any(|entry| entry == dir) {
            return Ok(PathChange::NotPresent);
        }

        self.env.write(&without_entry(&value, dir, sep)).await?;
        tracing::info!("Removed {} from the machine PATH", dir);
        Ok(PathChange::Removed)
    }
}

/// Non-empty entries of a PATH value
pub fn split_entries(value: &str, sep: char) -> impl Iterator<Item = &str> {
    value.split(sep).filter(|entry| !entry.is_empty())
}

/// `value` with `dir` appended
pub fn with_entry(value: &str, dir: &str, sep: char) -> String {
    let trimmed = value.trim_end_matches(sep);
    if trimmed.is_empty() {
        dir.to_string()
    } else {
        format!("{}{}{}", trimmed, sep, dir)
    }
}

/// `value` without any entry equal to `dir`; other entries keep their order
pub fn without_entry(value: &str, dir: &str, sep: char) -> String {
    split_entries(value, sep)
        .filter(|entry| *entry != dir)
        .collect::<Vec<_>>()
        .join(&sep.to_string())
}

/// Windows: `Path` in the `Machine` scope, via PowerShell
pub struct WindowsMachinePath {
    runner: Arc<dyn ProcessRunner>,
}

impl WindowsMachinePath {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn powershell(script: String) -> ProcessInvocation {
        ProcessInvocation::new(
            "powershell",
            ["-NoProfile", "-NonInteractive", "-Command"],
        )
        .arg(script)
    }
}

#[async_trait]
impl PathEnvironment for WindowsMachinePath {
    async fn read(&self) -> AliceResult<String> {
        let inv = Self::powershell(
            "[Environment]::GetEnvironmentVariable('Path', 'Machine')".to_string(),
        );
        let result = self.runner.run(&inv).await;
        if !result.success() {
            return Err(AliceError::PathUpdate(describe_failure(&result)));
        }
        Ok(result.stdout.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn write(&self, value: &str) -> AliceResult<()> {
        let inv = Self::powershell(format!(
            "[Environment]::SetEnvironmentVariable('Path', '{}', 'Machine')",
            value.replace('\'', "''")
        ));
        let result = self.runner.run(&inv).await;
        if result.success() {
            return Ok(());
        }

        let reason = describe_failure(&result);
        if is_access_denied(&reason) {
            Err(AliceError::PathAccessDenied(reason))
        } else {
            Err(AliceError::PathUpdate(reason))
        }
    }

    fn separator(&self) -> char {
        ';'
    }
}

fn describe_failure(result: &ProcessResult) -> String {
    match &result.start_error {
        Some(reason) => format!("could not start powershell: {}", reason),
        None => format!("powershell exited with {}: {}", result.exit_code, result.output()),
    }
}

fn is_access_denied(output: &str) -> bool {
    let lower = output.to_lowercase();
    lower.contains("securityexception")
        || lower.contains("not allowed")
        || lower.contains("access is denied")
        || lower.contains("unauthorized")
}

/// POSIX: a profile script that appends managed entries to PATH
pub struct ProfileScriptPath {
    script: PathBuf,
}

const SCRIPT_HEADER: &str = "# Managed by alice. Entries below are appended to PATH for login shells.";
const EXPORT_PREFIX: &str = "export PATH=\"$PATH:";

impl ProfileScriptPath {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    fn map_io(&self, err: std::io::Error) -> AliceError {
        let reason = format!("{}: {}", self.script.display(), err);
        match err.kind() {
            ErrorKind::PermissionDenied => AliceError::PathAccessDenied(reason),
            _ => AliceError::PathUpdate(reason),
        }
    }
}

#[async_trait]
impl PathEnvironment for ProfileScriptPath {
    async fn read(&self) -> AliceResult<String> {
        let content = match std::fs::read_to_string(&self.script) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => return Err(self.map_io(e)),
        };

        let entries: Vec<String> = content
            .lines()
            .filter_map(|line| line.strip_prefix(EXPORT_PREFIX))
            .filter_map(|rest| rest.strip_suffix('"'))
            .map(unescape)
            .collect();
        Ok(entries.join(":"))
    }

    async fn write(&self, value: &str) -> AliceResult<()> {
        let entries: Vec<&str> = split_entries(value, ':').collect();
        if entries.is_empty() {
            return match std::fs::remove_file(&self.script) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(self.map_io(e)),
            };
        }

        let mut content = String::from(SCRIPT_HEADER);
        content.push('\n');
        for entry in entries {
            content.push_str(EXPORT_PREFIX);
            content.push_str(&escape(entry));
            content.push_str("\"\n");
        }

        if let Some(parent) = self.script.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.map_io(e))?;
        }
        std::fs::write(&self.script, content).map_err(|e| self.map_io(e))
    }

    fn separator(&self) -> char {
        ':'
    }
}

/// Escape for the inside of a double-quoted shell word
fn escape(entry: &str) -> String {
    let mut out = String::with_capacity(entry.len());
    for c in entry.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn unescape(entry: &str) -> String {
    let mut out = String::with_capacity(entry.len());
    let mut chars = entry.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
