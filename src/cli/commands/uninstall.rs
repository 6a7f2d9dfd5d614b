//! alice uninstall - Remove the running installation

use async_trait::async_trait;

use crate::cli::commands::{CommandHandler, CommandSpec};
use crate::cli::output;
use crate::core::{AliceError, AliceResult, Context};
use crate::host::detached::REMOVAL_DELAY;
use crate::host::{DetachedTask, PathChange, PathManager};

pub const SPEC: CommandSpec = CommandSpec {
    name: "uninstall",
    params: &[],
    description: "Uninstalls the Alice Client from its installPath and removes it from the PATH variable",
};

pub struct UninstallCommand;

#[async_trait]
impl CommandHandler for UninstallCommand {
    async fn run(&self, ctx: &Context, args: &[String]) -> AliceResult<()> {
        if !ctx.privilege.is_elevated().await {
            return Err(AliceError::NotElevated("uninstall"));
        }
        SPEC.check_arity(args)?;

        let install_dir = ctx.exe_dir()?;
        let entry = install_dir.to_string_lossy();
        let paths = PathManager::new(ctx.path_env.as_ref());

        // A missing PATH entry is only a warning; removal still goes ahead.
        if !paths.is_on_path(&entry).await? {
            output::warning(&format!(
                "The installPath {} is not in the PATH variable. The program has not been installed correctly.",
                entry
            ));
        }

        if paths.remove_from_path(&entry).await? == PathChange::Removed {
            output::info(&format!("Removed {} from the PATH variable.", entry));
        }

        DetachedTask::remove_dir_after(install_dir, REMOVAL_DELAY).spawn(ctx.runner.as_ref())?;

        output::success(&format!(
            "The Alice Client has been uninstalled from the installPath {}.",
            entry
        ));
        output::info(&format!(
            "The directory will be deleted about {} seconds after this program exits.",
            REMOVAL_DELAY.as_secs()
        ));
        Ok(())
    }
}
