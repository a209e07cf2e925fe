//! `touch`: create empty files or refresh their timestamps.

use std::fmt::Write;

use crate::{Command, CommandContext, CommandResult};

/// Creates zero-byte files.
pub struct TouchCommand;

const USAGE_HELP: &str = "Usage: touch <filename> [filename2] [...]

Examples:
  touch file.txt              Create or update file.txt
  touch doc1.md doc2.md       Create multiple files
  touch /home/aura/test.log   Create a file by absolute path";

fn invalid_name(name: &str) -> bool {
    name.contains("..") || name.contains('<') || name.contains('>')
}

#[async_trait::async_trait]
impl Command for TouchCommand {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn description(&self) -> &'static str {
        "Create empty files or update timestamps"
    }

    fn usage(&self) -> &'static str {
        "touch <file> [file...]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        if args.is_empty() {
            ctx.error(USAGE_HELP);
            return Ok(());
        }

        let mut created = Vec::new();
        let mut updated = Vec::new();
        let mut errors = Vec::new();

        for arg in args {
            if invalid_name(arg) {
                errors.push(format!("Invalid filename: {arg}"));
                continue;
            }
            let (dir, name) = match ctx.resolve_file(arg) {
                Ok(parts) => parts,
                Err(e) => {
                    errors.push(format!("{arg}: {e}"));
                    continue;
                },
            };
            if !ctx.dir_exists(&dir) {
                errors.push(format!("Cannot create '{arg}': directory {dir} does not exist"));
                continue;
            }
            match ctx.vfs.touch_file(&name, &dir) {
                Ok((record, true)) => created.push(record),
                Ok((record, false)) => updated.push(record),
                Err(e) => errors.push(format!("{arg}: {e}")),
            }
        }

        let mut text = String::new();
        if !created.is_empty() {
            let _ = writeln!(text, "📄 Created {} file(s):", created.len());
            for f in &created {
                let _ = writeln!(text, "  ✅ {} ({})", f.full_path(), f.file_type);
            }
        }
        if !updated.is_empty() {
            let _ = writeln!(text, "🔄 Updated {} file(s):", updated.len());
            for f in &updated {
                let _ = writeln!(text, "  ⏰ {} (timestamp updated)", f.full_path());
            }
        }
        if !errors.is_empty() {
            let _ = writeln!(text, "❌ Errors:");
            for e in &errors {
                let _ = writeln!(text, "  ⚠️  {e}");
            }
        }

        let text = text.trim_end().to_owned();
        if errors.is_empty() {
            ctx.success(text);
        } else {
            ctx.warning(text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_names() {
        assert!(invalid_name("../x"));
        assert!(invalid_name("a<b"));
        assert!(invalid_name("a>b"));
        assert!(!invalid_name("notes.md"));
    }
}
