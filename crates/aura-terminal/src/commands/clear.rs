//! `clear`: empty the output log.

use crate::{Command, CommandContext, CommandResult};

/// Clears terminal output. Does not interrupt running sequences.
pub struct ClearCommand;

#[async_trait::async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn description(&self) -> &'static str {
        "Clear terminal output"
    }

    fn usage(&self) -> &'static str {
        "clear"
    }

    async fn execute(&self, _args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        ctx.clear_output();
        Ok(())
    }
}
