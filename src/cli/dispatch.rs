//! Command registry and dispatcher

use std::time::Duration;

use crate::cli::commands::{CommandHandler, CommandSpec};
use crate::cli::output;
use crate::core::{AliceError, Context};

/// Name -> handler, in registration order
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<(CommandSpec, Box<dyn CommandHandler>)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command.
    ///
    /// # Panics
    ///
    /// Registering the same name twice is a programming error.
    pub fn register(&mut self, spec: CommandSpec, handler: Box<dyn CommandHandler>) {
        assert!(
            self.get(spec.name).is_none(),
            "command '{}' registered twice",
            spec.name
        );
        self.entries.push((spec, handler));
    }

    pub fn get(&self, name: &str) -> Option<&dyn CommandHandler> {
        self.entries
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, handler)| handler.as_ref())
    }
}

/// What happened to a dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Completed,
    Unknown,
    Failed(i32),
}

impl Dispatch {
    pub fn exit_code(&self) -> i32 {
        match self {
            Dispatch::Completed | Dispatch::Unknown => 0,
            Dispatch::Failed(code) => *code,
        }
    }
}

/// Routes command names to handlers and reports their errors
pub struct Dispatcher {
    registry: CommandRegistry,
    ctx: Context,
    exit_delay: Duration,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, ctx: Context) -> Self {
        let exit_delay = ctx.config.exit_delay();
        Self {
            registry,
            ctx,
            exit_delay,
        }
    }

    /// Run `name` with `args`, then pause for the post-run delay
    pub async fn dispatch(&self, name: &str, args: &[String]) -> Dispatch {
        let outcome = match self.registry.get(name) {
            Some(handler) => match handler.run(&self.ctx, args).await {
                Ok(()) => Dispatch::Completed,
                Err(e) => {
                    report(&e);
                    Dispatch::Failed(e.exit_code())
                }
            },
            None => {
                output::warning(&format!(
                    "The command {} does not exist. Try \"alice help\" first.",
                    name
                ));
                Dispatch::Unknown
            }
        };

        self.settle().await;
        outcome
    }

    /// Keep the console open briefly so output stays readable
    pub async fn settle(&self) {
        if !self.exit_delay.is_zero() {
            tokio::time::sleep(self.exit_delay).await;
        }
    }
}

fn report(err: &AliceError) {
    tracing::debug!("Command failed: {:?}", err);
    output::error(&err.to_string());
    if let Some(hint) = err.hint() {
        output::info(&hint);
    }
}
