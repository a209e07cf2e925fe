//! `write`: save text to a file.

use aura_vfs::path::display_dir;
use aura_vfs::{FileType, SaveRequest};

use crate::{Command, CommandContext, CommandResult};

/// Saves text through the file system, compressing on `-z` and encrypting
/// when the session's encryption flag is on.
pub struct WriteCommand;

#[async_trait::async_trait]
impl Command for WriteCommand {
    fn name(&self) -> &'static str {
        "write"
    }

    fn description(&self) -> &'static str {
        "Write text to a file"
    }

    fn usage(&self) -> &'static str {
        "write <file> [-z] <text...>"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let Some((target, rest)) = args.split_first() else {
            ctx.error(format!("Usage: {}", self.usage()));
            return Ok(());
        };
        let (compress, words) = match rest.split_first() {
            Some((flag, words)) if flag == "-z" => (true, words),
            _ => (false, rest),
        };
        let text = words.join(" ");
        if text.is_empty() {
            ctx.error(format!("write: no text given\nUsage: {}", self.usage()));
            return Ok(());
        }

        let (dir, name) = ctx.resolve_file(target)?;
        if !ctx.dir_exists(&dir) {
            ctx.error(format!("write: directory {} does not exist", display_dir(&dir)));
            return Ok(());
        }

        let encrypt = ctx.session.get().encryption_enabled;
        let request = SaveRequest::new(name, text)
            .path(&dir)
            .file_type(FileType::from_file_name(target))
            .compress(compress)
            .encrypt(encrypt);
        let record = ctx.vfs.save_file(request)?;

        let mut notes = Vec::new();
        if record.is_compressed {
            notes.push("compressed");
        }
        if record.is_encrypted {
            notes.push("encrypted");
        }
        let suffix = if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        };
        ctx.success(format!(
            "✍️  Wrote {} bytes to {}{suffix}",
            record.size,
            record.full_path()
        ));
        Ok(())
    }
}
