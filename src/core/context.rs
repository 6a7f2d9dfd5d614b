//! Capabilities handed to every command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::{AliceError, AliceResult, Config};
use crate::host::{
    FileSystem, HostPrivilege, LocalFs, PathEnvironment, PrivilegeProbe, ProcessRunner,
    ProfileScriptPath, SystemRunner, WindowsMachinePath,
};

/// Everything a command may touch outside its own memory
pub struct Context {
    /// Configuration
    pub config: Config,

    /// External process runner
    pub runner: Arc<dyn ProcessRunner>,

    /// Machine-wide PATH backend
    pub path_env: Arc<dyn PathEnvironment>,

    /// Filesystem
    pub fs: Arc<dyn FileSystem>,

    /// Elevation probe
    pub privilege: Arc<dyn PrivilegeProbe>,

    /// Path of the running executable
    pub current_exe: PathBuf,
}

impl Context {
    /// Wire up the real host
    pub fn from_host(config: Config) -> AliceResult<Self> {
        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner::new());

        let path_env: Arc<dyn PathEnvironment> = if cfg!(windows) {
            Arc::new(WindowsMachinePath::new(runner.clone()))
        } else {
            Arc::new(ProfileScriptPath::new(config.install.profile_script.clone()))
        };

        let current_exe = std::env::current_exe()
            .map_err(|e| AliceError::other(format!("Could not locate the running executable: {}", e)))?;

        Ok(Self {
            config,
            runner,
            path_env,
            fs: Arc::new(LocalFs),
            privilege: Arc::new(HostPrivilege),
            current_exe,
        })
    }

    /// Directory the running executable lives in
    pub fn exe_dir(&self) -> AliceResult<&Path> {
        self.current_exe.parent().ok_or_else(|| {
            AliceError::other(format!(
                "Could not determine the directory of {}",
                self.current_exe.display()
            ))
        })
    }
}
