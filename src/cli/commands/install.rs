//! alice install - Install this executable and put it on the machine PATH

use std::path::{Path, PathBuf};
use async_trait::async_trait;

use crate::cli::commands::{CommandHandler, CommandSpec};
use crate::cli::output;
use crate::core::config::CONFIG_FILE;
use crate::core::{AliceError, AliceResult, Context};
use crate::host::{PathChange, PathManager};

pub const SPEC: CommandSpec = CommandSpec {
    name: "install",
    params: &["installPath"],
    description: "Installs the Alice Client into the installPath directory (MUST be empty) and adds it to the PATH variable",
};

pub struct InstallCommand;

#[async_trait]
impl CommandHandler for InstallCommand {
    async fn run(&self, ctx: &Context, args: &[String]) -> AliceResult<()> {
        if !ctx.privilege.is_elevated().await {
            return Err(AliceError::NotElevated("install"));
        }
        SPEC.check_arity(args)?;

        let install_dir = install_dir(&args[0])?;

        if !ctx.fs.is_dir(&install_dir) {
            output::info(&format!(
                "The installPath {} does not exist, creating...",
                install_dir.display()
            ));
            ctx.fs
                .create_dir_all(&install_dir)
                .map_err(|e| AliceError::file("creating", &install_dir, e))?;
        }

        let empty = ctx
            .fs
            .is_empty_dir(&install_dir)
            .map_err(|e| AliceError::file("reading", &install_dir, e))?;
        if !empty {
            return Err(AliceError::DirectoryNotEmpty(install_dir));
        }

        // Files copied before a failure stay where they are.
        for artifact in artifacts(ctx) {
            let Some(name) = artifact.file_name() else {
                continue;
            };
            let target = install_dir.join(name);
            ctx.fs
                .copy(&artifact, &target)
                .map_err(|e| AliceError::file("copying", &artifact, e))?;
            tracing::debug!("Copied {} -> {}", artifact.display(), target.display());
        }

        let entry = install_dir.to_string_lossy();
        match PathManager::new(ctx.path_env.as_ref()).add_to_path(&entry).await? {
            PathChange::AlreadyPresent => output::info(&format!(
                "The installPath {} is already in the PATH variable.",
                entry
            )),
            _ => tracing::debug!("PATH now contains {}", entry),
        }

        output::success(&format!(
            "The Alice Client has been installed in the installPath {}. Try \"alice help\" in a new console window!",
            entry
        ));
        Ok(())
    }
}

/// Absolute form of `raw` without trailing separators or `.` segments, so the
/// PATH entry matches the directory uninstall derives from the executable
fn install_dir(raw: &str) -> AliceResult<PathBuf> {
    let absolute = std::path::absolute(raw).map_err(|e| AliceError::file("resolving", raw, e))?;
    Ok(absolute.components().collect())
}

/// The running executable plus the support files that exist next to it
fn artifacts(ctx: &Context) -> Vec<PathBuf> {
    let exe = ctx.current_exe.clone();
    let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut files = vec![exe.clone()];
    if let Some(stem) = exe.file_stem() {
        let mut pdb = stem.to_os_string();
        pdb.push(".pdb");
        files.push(dir.join(pdb));
    }
    files.push(dir.join(CONFIG_FILE));

    files.dedup();
    files
        .into_iter()
        .enumerate()
        .filter(|(i, path)| *i == 0 || ctx.fs.is_file(path))
        .map(|(_, path)| path)
        .collect()
}
