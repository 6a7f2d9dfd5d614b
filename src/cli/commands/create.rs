//! alice create - Create a Doll project from a template repository

use std::path::PathBuf;
use async_trait::async_trait;

use crate::cli::commands::{CommandHandler, CommandSpec};
use crate::cli::output;
use crate::core::{AliceError, AliceResult, Context};
use crate::host::{tool_available, ProcessInvocation};
use crate::templates::TemplateManager;

pub const SPEC: CommandSpec = CommandSpec {
    name: "create",
    params: &["lang", "outPath"],
    description: "Creates a new Doll project of the specified lang (cs or ts) into the outPath (MUST be empty)",
};

pub struct CreateCommand;

#[async_trait]
impl CommandHandler for CreateCommand {
    async fn run(&self, ctx: &Context, args: &[String]) -> AliceResult<()> {
        SPEC.check_arity(args)?;

        let language = &args[0];
        let out_dir = PathBuf::from(&args[1]);

        if !ctx.fs.is_dir(&out_dir) {
            output::info(&format!(
                "The outPath {} does not exist, creating...",
                out_dir.display()
            ));
            ctx.fs
                .create_dir_all(&out_dir)
                .map_err(|e| AliceError::file("creating", &out_dir, e))?;
        }

        let empty = ctx
            .fs
            .is_empty_dir(&out_dir)
            .map_err(|e| AliceError::file("reading", &out_dir, e))?;
        if !empty {
            output::warning(&format!(
                "The outPath {} is not empty. Skipped.",
                out_dir.display()
            ));
            return Ok(());
        }

        let vcs = ctx.config.tools.vcs.as_str();
        if !tool_available(ctx.runner.as_ref(), vcs).await {
            return Err(AliceError::ToolUnavailable(vcs.to_string()));
        }

        let templates = TemplateManager::new(&ctx.config.templates);
        let source = templates.resolve(language)?;

        let clone = ProcessInvocation::new(vcs, ["clone", source])
            .arg(out_dir.to_string_lossy());
        let progress = output::spinner(&format!("Cloning {}...", source));
        let result = ctx.runner.run(&clone).await;
        progress.finish_and_clear();

        if !result.success() {
            // The tool's own message is kept out of the user-facing error.
            tracing::debug!(
                "{} failed: {}",
                clone,
                result.start_error.clone().unwrap_or_else(|| result.output())
            );
            return Err(AliceError::CloneFailed {
                url: source.to_string(),
            });
        }

        output::success(&format!(
            "The project has been created under {}, please follow the README.md to develop the dll.",
            out_dir.display()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::process::ProcessResult;
    use crate::testing::{args, FakeRunner, TestHost};
    use tempfile::tempdir;

    const DOLL: &str = "https://github.com/TomLBZ/Doll.git";

    #[tokio::test]
    async fn test_create_clones_cs_template() {
        let out = tempdir().unwrap();
        let out_path = out.path().to_str().unwrap();
        let host = TestHost::new("/opt/alice/alice");

        CreateCommand
            .run(&host.context(), &args(&["cs", out_path]))
            .await
            .unwrap();

        let calls = host.runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].to_string(), "git --version");
        assert_eq!(calls[1].program, "git");
        assert_eq!(calls[1].args, vec!["clone", DOLL, out_path]);
    }

    #[tokio::test]
    async fn test_create_makes_missing_output_directory() {
        let root = tempdir().unwrap();
        let out = root.path().join("y");
        let host = TestHost::new("/opt/alice/alice");

        CreateCommand
            .run(&host.context(), &args(&["CS", out.to_str().unwrap()]))
            .await
            .unwrap();

        assert!(out.is_dir());
        assert_eq!(host.runner.call_count(), 2);
    }

    #[tokio::test]
    async fn test_create_skips_non_empty_directory() {
        let out = tempdir().unwrap();
        std::fs::write(out.path().join("README.md"), "mine").unwrap();
        let host = TestHost::new("/opt/alice/alice");

        CreateCommand
            .run(&host.context(), &args(&["cs", out.path().to_str().unwrap()]))
            .await
            .unwrap();

        assert_eq!(host.runner.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_requires_vcs() {
        let out = tempdir().unwrap();
        let host = TestHost::new("/opt/alice/alice")
            .with_runner(FakeRunner::new().respond("git", ProcessResult::not_started("not found")));

        let err = CreateCommand
            .run(&host.context(), &args(&["cs", out.path().to_str().unwrap()]))
            .await
            .unwrap_err();

        assert!(matches!(err, AliceError::ToolUnavailable(tool) if tool == "git"));
        assert_eq!(host.runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unmapped_language() {
        let out = tempdir().unwrap();
        let host = TestHost::new("/opt/alice/alice");

        for language in ["ts", "rust"] {
            let err = CreateCommand
                .run(&host.context(), &args(&[language, out.path().to_str().unwrap()]))
                .await
                .unwrap_err();
            assert!(matches!(err, AliceError::InvalidLanguage(_)));
        }
        assert!(host.runner.calls().iter().all(|call| call.args[0] == "--version"));
    }

    #[tokio::test]
    async fn test_create_clone_failure_hides_tool_output() {
        let out = tempdir().unwrap();
        let host = TestHost::new("/opt/alice/alice").with_runner(
            FakeRunner::new()
                .respond("git", ProcessResult::exited(0, "git version 2.43.0"))
                .respond("git", ProcessResult::exited(128, "fatal: repository not found")),
        );

        let err = CreateCommand
            .run(&host.context(), &args(&["cs", out.path().to_str().unwrap()]))
            .await
            .unwrap_err();

        assert!(matches!(err, AliceError::CloneFailed { .. }));
        assert!(!err.to_string().contains("fatal"));
    }
}
