//! `help`: list commands, or describe one.

use std::fmt::Write;

use crate::{Command, CommandContext, CommandResult};

/// Lists the command table.
pub struct HelpCommand;

#[async_trait::async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "Show available commands, or usage for one command"
    }

    fn usage(&self) -> &'static str {
        "help [command]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        if let Some(name) = args.first() {
            let Some(command) = ctx.registry.get(name) else {
                ctx.error(format!("No help available for unknown command: {name}"));
                return Ok(());
            };
            let mut text = format!(
                "{}\n  {}\n\nUsage: {}",
                command.name(),
                command.description(),
                command.usage()
            );
            let aliases = ctx.registry.aliases_of(command.name());
            if !aliases.is_empty() {
                let _ = write!(text, "\nAliases: {}", aliases.join(", "));
            }
            ctx.info(text);
            return Ok(());
        }

        let width = ctx
            .registry
            .commands()
            .map(|c| c.usage().len())
            .max()
            .unwrap_or_default();
        let mut text = String::from("Aura OS Terminal Commands:\n");
        for command in ctx.registry.commands() {
            let _ = write!(
                text,
                "\n  {:<width$}  {}",
                command.usage(),
                command.description()
            );
        }
        text.push_str("\n\nTip: chain commands with && (e.g. \"theme dark && clear\")");
        ctx.info(text);
        Ok(())
    }
}
