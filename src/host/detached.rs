//! Deferred work that outlives this process
//!
//! A detached task is spawned and abandoned: nothing waits for it and its
//! result is never observed, so success can't be confirmed from here.

use std::path::Path;
use std::time::Duration;

use crate::core::AliceResult;
use crate::host::process::{ProcessInvocation, ProcessRunner};

/// How long the deferred deletion waits before touching the directory
pub const REMOVAL_DELAY: Duration = Duration::from_secs(5);

/// A command to run after the current process has exited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedTask {
    invocation: ProcessInvocation,
}

impl DetachedTask {
    /// Recursively delete `dir` once `delay` has passed
    pub fn remove_dir_after(dir: &Path, delay: Duration) -> Self {
        let secs = delay.as_secs().max(1);
        let dir = dir.to_string_lossy();

        let invocation = if cfg!(windows) {
            ProcessInvocation::new(
                "powershell",
                ["-NoProfile", "-NonInteractive", "-WindowStyle", "Hidden", "-Command"],
            )
            .arg(format!(
                "Start-Sleep -Seconds {}; Remove-Item -LiteralPath '{}' -Recurse -Force",
                secs,
                dir.replace('\'', "''")
            ))
        } else {
            // The directory is passed as $1, never spliced into the script.
            ProcessInvocation::new(
                "sh",
                [
                    "-c".to_string(),
                    format!("sleep {}; rm -rf -- \"$1\"", secs),
                    "alice-uninstall".to_string(),
                    dir.into_owned(),
                ],
            )
        };

        Self {
            invocation: invocation.quiet(),
        }
    }

    /// Start the task and return immediately
    pub fn spawn(self, runner: &dyn ProcessRunner) -> AliceResult<()> {
        runner.spawn_detached(&self.invocation)
    }
}
