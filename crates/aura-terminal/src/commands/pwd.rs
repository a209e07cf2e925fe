//! `pwd`: print the working directory.

use aura_vfs::path::display_dir;

use crate::{Command, CommandContext, CommandResult};

/// Echoes the working directory.
pub struct PwdCommand;

#[async_trait::async_trait]
impl Command for PwdCommand {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn description(&self) -> &'static str {
        "Print the current directory"
    }

    fn usage(&self) -> &'static str {
        "pwd"
    }

    async fn execute(&self, _args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        ctx.info(display_dir(&ctx.cwd()));
        Ok(())
    }
}
