//! `rm`: delete files.

use aura_vfs::VfsError;

use crate::{Command, CommandContext, CommandResult};

/// Deletes file records.
pub struct RmCommand;

#[async_trait::async_trait]
impl Command for RmCommand {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn description(&self) -> &'static str {
        "Remove files"
    }

    fn usage(&self) -> &'static str {
        "rm <file> [file...]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        if args.is_empty() {
            ctx.error(format!("Usage: {}", self.usage()));
            return Ok(());
        }
        for arg in args {
            let (dir, name) = ctx.resolve_file(arg)?;
            match ctx.vfs.delete_file(&name, &dir) {
                Ok(()) => ctx.success(format!("🗑️  Removed {dir}{name}")),
                Err(VfsError::NotFound(_)) => {
                    ctx.error(format!("rm: cannot remove '{arg}': No such file"));
                },
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
