//! alice help - List available commands

use async_trait::async_trait;
use console::style;

use crate::cli::commands::{CommandHandler, CommandSpec};
use crate::cli::output;
use crate::core::{AliceError, AliceResult, Context};

pub const SPEC: CommandSpec = CommandSpec {
    name: "help",
    params: &[],
    description: "Displays all available commands",
};

/// Prints the usage of every registered command, or of a single one
pub struct HelpCommand {
    specs: Vec<CommandSpec>,
}

impl HelpCommand {
    pub fn new(specs: Vec<CommandSpec>) -> Self {
        Self { specs }
    }

    /// Help text for `filter`, or for every command when `None`
    pub fn render(&self, filter: Option<&str>) -> Option<String> {
        let selected: Vec<&CommandSpec> = self
            .specs
            .iter()
            .filter(|spec| filter.map_or(true, |name| spec.name == name))
            .collect();

        if selected.is_empty() {
            return None;
        }

        let mut text = String::new();
        for spec in selected {
            text.push_str(&format!(
                "  {}\n    {}\n",
                style(spec.usage()).cyan().bold(),
                spec.description
            ));
        }
        Some(text)
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn run(&self, _ctx: &Context, args: &[String]) -> AliceResult<()> {
        if args.len() > 1 {
            return Err(AliceError::ArgumentCount {
                command: SPEC.name,
                expected: "0 or 1".to_string(),
                given: args.len(),
            });
        }

        let filter = args.first().map(|name| name.to_lowercase());
        match self.render(filter.as_deref()) {
            Some(text) => {
                output::info("Available commands:");
                print!("{}", text);
            }
            None => output::warning(&format!(
                "The command {} does not exist. Try \"alice help\" first.",
                args[0]
            )),
        }
        Ok(())
    }
}
