//! `history`: list submitted lines.

use crate::{Command, CommandContext, CommandError, CommandResult};

/// Prints the command history, optionally only the last `n` entries.
pub struct HistoryCommand;

#[async_trait::async_trait]
impl Command for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn description(&self) -> &'static str {
        "Show command history"
    }

    fn usage(&self) -> &'static str {
        "history [count]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let history = ctx.session.get().command_history;
        let count = match args.first() {
            Some(n) => n.parse::<usize>().map_err(|_| {
                CommandError::InvalidArguments(format!("'{n}' is not a count"))
            })?,
            None => history.len(),
        };

        let skip = history.len().saturating_sub(count);
        let lines: Vec<String> = history
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, line)| format!("{:>4}  {line}", i.saturating_add(1)))
            .collect();
        if lines.is_empty() {
            ctx.info("No commands in history");
        } else {
            ctx.info(lines.join("\n"));
        }
        Ok(())
    }
}
