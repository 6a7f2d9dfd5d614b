//! Host capability probes

use std::env;
use async_trait::async_trait;

use crate::host::process::{ProcessInvocation, ProcessRunner, SystemRunner};

/// Answers whether the current process runs elevated
#[async_trait]
pub trait PrivilegeProbe: Send + Sync {
    async fn is_elevated(&self) -> bool;
}

/// Probe for the real host
#[derive(Debug, Default, Clone, Copy)]
pub struct HostPrivilege;

#[async_trait]
impl PrivilegeProbe for HostPrivilege {
    async fn is_elevated(&self) -> bool {
        if cfg!(windows) {
            // `net session` needs the administrator token.
            let inv = ProcessInvocation::new("net", ["session"]).quiet();
            SystemRunner::new().run(&inv).await.success()
        } else {
            is_root_user(env::var("USER").ok().as_deref())
        }
    }
}

/// POSIX approximation: the invoking user is called `root`
pub fn is_root_user(user: Option<&str>) -> bool {
    user == Some("root")
}

/// True iff `<program> --version` starts and exits with code 0
pub async fn tool_available(runner: &dyn ProcessRunner, program: &str) -> bool {
    let result = runner
        .run(&ProcessInvocation::new(program, ["--version"]))
        .await;

    if !result.started {
        tracing::debug!(
            "{} could not be started: {}",
            program,
            result.start_error.as_deref().unwrap_or("unknown error")
        );
    } else {
        tracing::debug!("{} --version: {}", program, result.stdout.trim());
    }

    result.success()
}
