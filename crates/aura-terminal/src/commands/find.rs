//! `find`: search files by name, content or tag.

use crate::{Command, CommandContext, CommandResult};

/// Searches the current directory, or everywhere with `-a`.
pub struct FindCommand;

#[async_trait::async_trait]
impl Command for FindCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn description(&self) -> &'static str {
        "Search files by name, content or tag"
    }

    fn usage(&self) -> &'static str {
        "find [-a] <query>"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let (everywhere, words) = match args.split_first() {
            Some((flag, words)) if flag == "-a" || flag == "--all" => (true, words),
            _ => (false, args),
        };
        let query = words.join(" ");
        if query.is_empty() {
            ctx.error(format!("Usage: {}", self.usage()));
            return Ok(());
        }

        let cwd = ctx.cwd();
        let scope = (!everywhere).then_some(cwd.as_str());
        let matches = ctx.vfs.search_files(&query, scope);
        if matches.is_empty() {
            ctx.warning(format!("No files match '{query}'"));
            return Ok(());
        }
        let lines: Vec<String> = matches
            .iter()
            .map(|f| format!("📄 {} ({})", f.full_path(), f.file_type))
            .collect();
        ctx.success(format!(
            "🔍 {} match(es) for '{query}':\n{}",
            matches.len(),
            lines.join("\n")
        ));
        Ok(())
    }
}
