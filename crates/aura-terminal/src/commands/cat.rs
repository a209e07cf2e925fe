//! `cat`: print file contents.

use crate::{Command, CommandContext, CommandResult};

/// Prints the plaintext of one or more files.
pub struct CatCommand;

#[async_trait::async_trait]
impl Command for CatCommand {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn description(&self) -> &'static str {
        "Print file contents"
    }

    fn usage(&self) -> &'static str {
        "cat <file> [file...]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        if args.is_empty() {
            ctx.error(format!("Usage: {}", self.usage()));
            return Ok(());
        }
        for arg in args {
            let (dir, name) = ctx.resolve_file(arg)?;
            match ctx.vfs.get_file(&name, &dir) {
                Ok(Some(record)) => ctx.info(record.content),
                Ok(None) => ctx.error(format!("cat: {arg}: No such file")),
                Err(e) => ctx.error(format!("cat: {arg}: {e}")),
            }
        }
        Ok(())
    }
}
