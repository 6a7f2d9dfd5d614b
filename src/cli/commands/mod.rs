//! CLI command implementations
//!
//! Every command is a [`CommandSpec`] (name, parameters, description) paired
//! with a [`CommandHandler`]. The handler owns all of its side effects and
//! checks its own gates in order, so a failing gate aborts before anything
//! later in the pipeline runs.

pub mod build;
pub mod create;
pub mod help;
pub mod install;
pub mod uninstall;

use async_trait::async_trait;

use crate::cli::dispatch::CommandRegistry;
use crate::core::{AliceError, AliceResult, Context};

/// Static description of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub description: &'static str,
}

impl CommandSpec {
    /// `name param1 param2`
    pub fn usage(&self) -> String {
        std::iter::once(self.name)
            .chain(self.params.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Require exactly one argument per parameter
    pub fn check_arity(&self, args: &[String]) -> AliceResult<()> {
        if args.len() == self.params.len() {
            return Ok(());
        }
        Err(AliceError::ArgumentCount {
            command: self.name,
            expected: self.params.len().to_string(),
            given: args.len(),
        })
    }
}

/// Behaviour behind a command name
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: &Context, args: &[String]) -> AliceResult<()>;
}

/// Specs of the built-in commands, in help order
pub const BUILTIN: &[CommandSpec] = &[
    help::SPEC,
    install::SPEC,
    uninstall::SPEC,
    create::SPEC,
    build::SPEC,
];

/// Registry holding every built-in command
pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(help::SPEC, Box::new(help::HelpCommand::new(BUILTIN.to_vec())));
    registry.register(install::SPEC, Box::new(install::InstallCommand));
    registry.register(uninstall::SPEC, Box::new(uninstall::UninstallCommand));
    registry.register(create::SPEC, Box::new(create::CreateCommand));
    registry.register(build::SPEC, Box::new(build::BuildCommand));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{args, fake_exe, TestHost};
    use tempfile::tempdir;

    #[test]
    fn test_usage_lists_params() {
        assert_eq!(create::SPEC.usage(), "create lang outPath");
        assert_eq!(uninstall::SPEC.usage(), "uninstall");
    }

    #[test]
    fn test_registry_serves_every_builtin() {
        let registry = registry();
        let names: Vec<&str> = BUILTIN.iter().map(|spec| spec.name).collect();
        assert_eq!(names, vec!["help", "install", "uninstall", "create", "build"]);
        assert!(names.iter().all(|name| registry.get(name).is_some()));
        assert!(registry.get("deploy").is_none());
    }

    #[tokio::test]
    async fn test_wrong_arity_never_touches_host() {
        let cases: &[(&str, &[&str])] = &[
            ("install", &[]),
            ("install", &["/tmp/a", "/tmp/b"]),
            ("uninstall", &["/tmp/a"]),
            ("create", &["cs"]),
            ("create", &["cs", "/tmp/y", "extra"]),
            ("build", &["/proj"]),
            ("build", &[]),
            ("help", &["install", "build"]),
        ];

        for (name, given) in cases {
            let dir = tempdir().unwrap();
            let host = TestHost::new(fake_exe(dir.path()));
            let ctx = host.context();
            let registry = registry();

            let err = registry
                .get(name)
                .unwrap()
                .run(&ctx, &args(given))
                .await
                .unwrap_err();

            assert!(
                matches!(err, AliceError::ArgumentCount { .. }),
                "{} {:?}: {}",
                name,
                given,
                err
            );
            assert_eq!(host.runner.call_count(), 0, "{} ran a process", name);
            assert!(host.runner.detached().is_empty());
            assert_eq!(host.fs.calls(), 0, "{} touched the filesystem", name);
            assert_eq!(host.path.writes(), 0);
        }
    }
}
