//! alice build - Build a Doll project image and push it to the registry

use std::path::PathBuf;
use std::time::Instant;
use async_trait::async_trait;

use crate::cli::commands::{CommandHandler, CommandSpec};
use crate::cli::output;
use crate::core::{AliceError, AliceResult, Context};
use crate::host::{tool_available, ProcessInvocation};
use crate::utils;

pub const SPEC: CommandSpec = CommandSpec {
    name: "build",
    params: &["projectPath", "user"],
    description: "Builds the project at the projectPath and uploads it to DockerHub under the user specified. You must \"docker login\" first!",
};

/// Runtime layer directory inside a project
pub const LAYER_DIR: &str = "Doll";

/// Build descriptor inside the layer directory
pub const BUILD_DESCRIPTOR: &str = "Dockerfile";

/// Append-only record of successful pushes, kept in the project directory
pub const BUILD_LOG: &str = "buildlog.alice";

pub struct BuildCommand;

#[async_trait]
impl CommandHandler for BuildCommand {
    async fn run(&self, ctx: &Context, args: &[String]) -> AliceResult<()> {
        output::info("Validating information...");
        SPEC.check_arity(args)?;

        let project = PathBuf::from(&args[0]);
        let user = &args[1];

        if !ctx.fs.is_dir(&project) {
            return Err(AliceError::ProjectNotFound(project));
        }
        let empty = ctx
            .fs
            .is_empty_dir(&project)
            .map_err(|e| AliceError::file("reading", &project, e))?;
        if empty {
            return Err(AliceError::ProjectEmpty(project));
        }

        let layer_dir = project.join(LAYER_DIR);
        let descriptor = layer_dir.join(BUILD_DESCRIPTOR);
        if !ctx.fs.is_dir(&layer_dir) || !ctx.fs.is_file(&descriptor) {
            return Err(AliceError::InvalidProject(project));
        }

        let container = ctx.config.tools.container.as_str();
        if !tool_available(ctx.runner.as_ref(), container).await {
            return Err(AliceError::ToolUnavailable(container.to_string()));
        }

        let start_time = Instant::now();
        let tag = format!("{}/{}:latest", user, utils::random_image_id());

        let build = ProcessInvocation::new(container, ["build", "-t", tag.as_str(), "-f"])
            .arg(descriptor.to_string_lossy())
            .arg(project.to_string_lossy());

        output::step(1, 2, "Building...");
        let progress = output::spinner(&format!("Building {}", tag));
        let result = ctx.runner.run(&build).await;
        progress.finish_and_clear();

        let result = result.ensure_started(container)?;
        if !result.success() {
            return Err(AliceError::BuildFailed {
                output: result.output(),
                command: build.to_string(),
            });
        }

        let push = ProcessInvocation::new(container, ["push", tag.as_str()]);

        output::step(2, 2, "Pushing...");
        let progress = output::spinner(&format!("Pushing {}", tag));
        let result = ctx.runner.run(&push).await;
        progress.finish_and_clear();

        let result = result.ensure_started(container)?;
        if !result.success() {
            return Err(AliceError::PushFailed {
                output: result.output(),
                command: push.to_string(),
            });
        }

        let log = project.join(BUILD_LOG);
        let record = format!("{}: Pushed to [{}]", utils::log_timestamp(), tag);
        ctx.fs
            .append_line(&log, &record)
            .map_err(|e| AliceError::file("writing", &log, e))?;

        output::success(&format!(
            "The docker image has been built and pushed to {} in {}.",
            tag,
            output::format_duration(start_time.elapsed().as_millis())
        ));
        Ok(())
    }
}
