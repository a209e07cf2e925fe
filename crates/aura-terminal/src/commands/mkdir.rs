//! `mkdir`: create folders.

use std::fmt::Write;

use aura_vfs::path::{ROOT, join_dir, parent_dir};

use super::dir_name;
use crate::{Command, CommandContext, CommandResult};

/// Creates folder records, optionally with missing parents.
pub struct MkdirCommand;

const USAGE_HELP: &str = "Usage: mkdir [-p] <directory> [directory2] [...]

Options:
  -p    Create parent directories as needed

Examples:
  mkdir newdir                  Create directory 'newdir'
  mkdir dir1 dir2 dir3          Create multiple directories
  mkdir -p /path/to/deep/dir    Create nested directories
  mkdir ~/projects/myapp        Create a directory under home";

#[derive(Default)]
struct Outcome {
    created: Vec<String>,
    existing: Vec<String>,
    errors: Vec<String>,
}

impl Outcome {
    fn render(&self) -> String {
        let mut text = String::new();
        if !self.created.is_empty() {
            let noun = if self.created.len() == 1 { "directory" } else { "directories" };
            let _ = writeln!(text, "📁 Created {} {noun}:", self.created.len());
            for d in &self.created {
                let _ = writeln!(text, "  ✅ {d}");
            }
        }
        if !self.existing.is_empty() {
            let _ = writeln!(text, "📂 Already exists:");
            for d in &self.existing {
                let _ = writeln!(text, "  ℹ️  {d}");
            }
        }
        if !self.errors.is_empty() {
            let _ = writeln!(text, "❌ Errors:");
            for e in &self.errors {
                let _ = writeln!(text, "  ⚠️  {e}");
            }
        }
        text.trim_end().to_owned()
    }
}

#[async_trait::async_trait]
impl Command for MkdirCommand {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn description(&self) -> &'static str {
        "Create directories"
    }

    fn usage(&self) -> &'static str {
        "mkdir [-p] <dir> [dir...]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let (parents, targets) = match args.split_first() {
            None => {
                ctx.error(USAGE_HELP);
                return Ok(());
            },
            Some((flag, rest)) if flag == "-p" => (true, rest),
            Some(_) => (false, args),
        };
        if targets.is_empty() {
            ctx.error("mkdir: missing directory name after -p flag");
            return Ok(());
        }

        let mut outcome = Outcome::default();
        for target in targets {
            if target.contains("..") && !parents {
                outcome.errors.push(format!("Invalid directory name: {target}"));
                continue;
            }
            let dir = match ctx.resolve_dir(target) {
                Ok(dir) => dir,
                Err(e) => {
                    outcome.errors.push(format!("{target}: {e}"));
                    continue;
                },
            };
            if ctx.dir_exists(&dir) {
                outcome.existing.push(dir);
                continue;
            }

            if parents {
                create_with_parents(ctx, &dir, &mut outcome);
            } else {
                let parent = parent_dir(&dir).unwrap_or_else(|| ROOT.to_owned());
                if !ctx.dir_exists(&parent) {
                    outcome.errors.push(format!(
                        "Cannot create directory '{target}': parent directory does not exist \
                         (use -p to create parent directories)"
                    ));
                    continue;
                }
                match ctx.vfs.create_folder(dir_name(&dir), &parent) {
                    Ok(folder) => outcome.created.push(folder.path),
                    Err(e) => outcome.errors.push(format!("{target}: {e}")),
                }
            }
        }

        let text = if outcome.created.is_empty()
            && outcome.existing.is_empty()
            && outcome.errors.is_empty()
        {
            "✅ Directory creation completed".to_owned()
        } else {
            outcome.render()
        };
        if outcome.errors.is_empty() {
            ctx.success(text);
        } else {
            ctx.warning(text);
        }
        Ok(())
    }
}

fn create_with_parents(ctx: &CommandContext<'_>, dir: &str, outcome: &mut Outcome) {
    let mut current = ROOT.to_owned();
    for segment in dir.split('/').filter(|s| !s.is_empty()) {
        let next = join_dir(&current, segment);
        if !ctx.dir_exists(&next) {
            match ctx.vfs.create_folder(segment, &current) {
                Ok(folder) => outcome.created.push(folder.path),
                Err(e) => {
                    outcome.errors.push(format!("{next}: {e}"));
                    return;
                },
            }
        }
        current = next;
    }
}
