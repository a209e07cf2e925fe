//! `cd`: change the working directory.

use aura_vfs::VfsError;
use aura_vfs::path::display_dir;

use crate::{Command, CommandContext, CommandResult, SessionPatch};

/// Changes the session's working directory.
///
/// Unlike [`VirtualFileSystem::navigate_up`](aura_vfs::VirtualFileSystem::navigate_up),
/// `cd ..` at the root is reported as an error.
pub struct CdCommand;

#[async_trait::async_trait]
impl Command for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn description(&self) -> &'static str {
        "Change directory"
    }

    fn usage(&self) -> &'static str {
        "cd [path]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let target = args.first().map_or("~", String::as_str);
        let dir = match ctx.resolve_dir(target) {
            Ok(dir) => dir,
            Err(VfsError::Validation(_)) => {
                ctx.error("Already at the root directory");
                return Ok(());
            },
            Err(e) => return Err(e.into()),
        };

        if !ctx.dir_exists(&dir) {
            ctx.error(format!("Directory not found: {}", display_dir(&dir)));
            return Ok(());
        }

        ctx.session.update(SessionPatch {
            current_directory: Some(dir.clone()),
            ..SessionPatch::default()
        })?;
        if args.is_empty() {
            ctx.success("Changed to home directory");
        } else {
            ctx.success(format!("Changed directory to {}", display_dir(&dir)));
        }
        Ok(())
    }
}
