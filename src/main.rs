//! Alice - client for the Doll platform
//!
//! Alice installs itself onto the machine PATH, scaffolds new Doll projects
//! from template repositories with git, and builds and publishes their
//! container images with docker. Each command is an ordered pipeline of
//! gates followed by side-effecting steps against external tools.

mod cli;
mod core;
mod host;
mod templates;
mod utils;

#[cfg(test)]
mod testing;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::dispatch::Dispatcher;
use cli::interactive::{self, TerminalPrompter};
use cli::{commands, output, Cli};
use crate::core::{AliceResult, Config, Context};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "alice=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let no_wait = cli.no_wait;
    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::error(&e.to_string());
            // The dispatcher never ran, so pause here instead.
            if !no_wait {
                tokio::time::sleep(fallback_delay()).await;
            }
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

/// Post-run delay when the configuration could not be loaded
fn fallback_delay() -> Duration {
    Config::default()
        .apply_overrides(|key| std::env::var(key).ok())
        .exit_delay()
}

async fn run(cli: Cli) -> AliceResult<i32> {
    let mut config = Config::load()?;
    if cli.no_wait {
        config.ui.exit_delay_ms = 0;
    }

    let ctx = Context::from_host(config)?;
    let dispatcher = Dispatcher::new(commands::registry(), ctx);

    let outcome = match cli.command {
        Some(command) => {
            tracing::debug!("Program arguments: {} {}", command, cli.args.join(" "));
            dispatcher
                .dispatch(&command.to_lowercase(), &cli.args)
                .await
        }
        None => interactive::run(&dispatcher, &mut TerminalPrompter).await,
    };

    Ok(outcome.exit_code())
}
