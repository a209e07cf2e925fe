//! `rmdir`: delete a folder and everything under it.

use aura_vfs::VfsError;
use aura_vfs::path::{ROOT, display_dir, is_within, parent_dir};

use crate::{Command, CommandContext, CommandResult, SessionPatch};

/// Deletes a folder record, cascading to nested folders and files.
///
/// If the working directory was inside the deleted folder, the session
/// moves to the folder's parent.
pub struct RmdirCommand;

#[async_trait::async_trait]
impl Command for RmdirCommand {
    fn name(&self) -> &'static str {
        "rmdir"
    }

    fn description(&self) -> &'static str {
        "Remove a directory and its contents"
    }

    fn usage(&self) -> &'static str {
        "rmdir <dir>"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let Some(target) = args.first() else {
            ctx.error(format!("Usage: {}", self.usage()));
            return Ok(());
        };
        let dir = ctx.resolve_dir(target)?;
        if ctx.settings.is_system_path(&dir) {
            ctx.error(format!(
                "rmdir: cannot remove built-in directory {}",
                display_dir(&dir)
            ));
            return Ok(());
        }

        match ctx.vfs.delete_folder(&dir) {
            Ok(()) => {},
            Err(VfsError::NotFound(_)) => {
                ctx.error(format!("rmdir: {}: No such directory", display_dir(&dir)));
                return Ok(());
            },
            Err(e) => return Err(e.into()),
        }

        let cwd = ctx.cwd();
        if is_within(&cwd, &dir) {
            let parent = parent_dir(&dir).unwrap_or_else(|| ROOT.to_owned());
            ctx.session.update(SessionPatch {
                current_directory: Some(parent),
                ..SessionPatch::default()
            })?;
        }
        ctx.success(format!("🗑️  Removed directory {}", display_dir(&dir)));
        Ok(())
    }
}
