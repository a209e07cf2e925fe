//! `ls`: list a directory.

use std::collections::BTreeSet;

use aura_vfs::path::{display_dir, parent_dir};

use super::{dir_name, format_size};
use crate::{Command, CommandContext, CommandResult};

/// Lists built-in directories, folders and files in a directory.
pub struct LsCommand;

#[async_trait::async_trait]
impl Command for LsCommand {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn description(&self) -> &'static str {
        "List directory contents"
    }

    fn usage(&self) -> &'static str {
        "ls [path]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let dir = ctx.resolve_dir(args.first().map_or(".", String::as_str))?;
        if !ctx.dir_exists(&dir) {
            ctx.error(format!("Directory not found: {}", display_dir(&dir)));
            return Ok(());
        }

        let mut dirs: BTreeSet<String> = ctx
            .settings
            .system_paths
            .iter()
            .filter(|p| parent_dir(p).as_deref() == Some(dir.as_str()))
            .map(|p| dir_name(p).to_owned())
            .collect();
        dirs.extend(ctx.vfs.folders_in_path(&dir).into_iter().map(|f| f.name));

        let mut lines: Vec<String> = dirs.into_iter().map(|d| format!("📁 {d}/")).collect();
        lines.extend(
            ctx.vfs
                .files_in_path(&dir)
                .into_iter()
                .map(|f| format!("📄 {}  {}", f.name, format_size(f.size))),
        );

        if lines.is_empty() {
            ctx.warning("Directory empty");
        } else {
            ctx.success(lines.join("\n"));
        }
        Ok(())
    }
}
