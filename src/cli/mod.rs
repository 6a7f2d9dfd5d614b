//! CLI module for Alice
//!
//! Provides the command-line surface using clap. Command names are routed
//! through the [`dispatch::Dispatcher`] rather than clap subcommands, so the
//! same registry serves argv and the interactive menu.

pub mod commands;
pub mod dispatch;
pub mod interactive;
pub mod output;

use clap::Parser;

/// Alice client - installs itself, scaffolds Doll projects and publishes their images
#[derive(Parser)]
#[command(name = "alice")]
#[command(author = "Alice Contributors")]
#[command(version)]
#[command(about = "Installs itself, scaffolds Doll projects and builds/pushes their images", long_about = None)]
#[command(after_help = "Run \"alice help\" for the list of commands.")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Exit right away instead of pausing after the command
    #[arg(long, env = "ALICE_NO_WAIT")]
    pub no_wait: bool,

    /// Command to run (help, install, uninstall, create, build)
    pub command: Option<String>,

    /// Arguments for the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
