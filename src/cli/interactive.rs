//! First-run menu shown when alice is started without arguments
//!
//! The menu only collects answers and forwards them to the dispatcher.

use std::io::{self, BufRead, IsTerminal, Write};
use dialoguer::Input;

use crate::cli::dispatch::{Dispatch, Dispatcher};
use crate::cli::output;
use crate::core::AliceResult;

/// Source of answers for the menu
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> AliceResult<String>;
}

/// Prompts on the terminal, or reads plain lines when stdin is not one
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> AliceResult<String> {
        if prompts_on_terminal(io::stdin().is_terminal(), console::Term::stderr().is_term()) {
            let answer: String = Input::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?;
            return Ok(answer);
        }

        print!("{}: ", prompt);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// dialoguer reads keys from the terminal and draws on stderr, so it is only
/// usable when both are attached; otherwise answers come from stdin lines.
fn prompts_on_terminal(stdin_is_term: bool, stderr_is_term: bool) -> bool {
    stdin_is_term && stderr_is_term
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Install,
    Uninstall,
    Help,
    Quit,
}

impl MenuChoice {
    /// Anything other than i/u/h quits
    pub fn parse(answer: &str) -> Self {
        match answer.trim() {
            "i" => MenuChoice::Install,
            "u" => MenuChoice::Uninstall,
            "h" => MenuChoice::Help,
            _ => MenuChoice::Quit,
        }
    }
}

/// Ask what to do and forward the answer to `dispatcher`
pub async fn run(dispatcher: &Dispatcher, prompter: &mut dyn Prompter) -> Dispatch {
    output::info(
        "No program arguments provided, do you want to install (i) / uninstall (u)? (q for quit, h for help)",
    );

    // An unreadable answer counts as "quit".
    let answer = prompter.ask("i/u/q/h").unwrap_or_else(|e| {
        tracing::debug!("Menu prompt failed: {}", e);
        String::new()
    });

    match MenuChoice::parse(&answer) {
        MenuChoice::Install => {
            let dir = prompter
                .ask("Enter the install directory")
                .unwrap_or_default();
            let dir = dir.trim();
            if dir.is_empty() {
                output::info("No install directory provided, exiting...");
                dispatcher.settle().await;
                return Dispatch::Completed;
            }
            dispatcher.dispatch("install", &[dir.to_string()]).await
        }
        MenuChoice::Uninstall => dispatcher.dispatch("uninstall", &[]).await,
        MenuChoice::Help => dispatcher.dispatch("help", &[]).await,
        MenuChoice::Quit => {
            output::info("Exiting...");
            dispatcher.settle().await;
            Dispatch::Completed
        }
    }
}
