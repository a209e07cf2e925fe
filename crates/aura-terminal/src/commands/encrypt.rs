//! `encrypt`: toggle, set or query the encryption flag.
//!
//! The flag decides whether `write` stores new content encrypted.

use super::action;
use crate::{Command, CommandContext, CommandResult, SessionPatch};

/// Controls `encryptionEnabled`.
pub struct EncryptCommand;

fn set_flag(ctx: &CommandContext<'_>, enabled: bool) -> CommandResult {
    ctx.session.update(SessionPatch {
        encryption_enabled: Some(enabled),
        ..SessionPatch::default()
    })?;
    Ok(())
}

#[async_trait::async_trait]
impl Command for EncryptCommand {
    fn name(&self) -> &'static str {
        "encrypt"
    }

    fn description(&self) -> &'static str {
        "Toggle encryption of newly written files"
    }

    fn usage(&self) -> &'static str {
        "encrypt [on|off|status|toggle]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let enabled = ctx.session.get().encryption_enabled;
        match action(args, "toggle").as_str() {
            "on" | "enable" => {
                if enabled {
                    ctx.warning("🔒 Encryption is already enabled");
                } else {
                    set_flag(ctx, true)?;
                    ctx.success(
                        "🔒 Encryption system ACTIVATED\n\nFiles written from the terminal \
                         will now be stored encrypted.",
                    );
                }
            },
            "off" | "disable" => {
                if enabled {
                    set_flag(ctx, false)?;
                    ctx.warning(
                        "🔓 Encryption system DEACTIVATED\n\nFiles written from the terminal \
                         are now stored in plaintext.",
                    );
                } else {
                    ctx.warning("🔓 Encryption is already disabled");
                }
            },
            "status" => {
                let (state, level) = if enabled { ("YES", "HIGH") } else { ("NO", "LOW") };
                let note = if enabled {
                    "New files are stored encrypted."
                } else {
                    "WARNING: new files are stored without encryption!"
                };
                ctx.info(format!(
                    "🔐 Encryption System Status:\n  Enabled: {state}\n  Level: {level}\n\n{note}"
                ));
            },
            _ => {
                set_flag(ctx, !enabled)?;
                if enabled {
                    ctx.warning("🔓 Encryption system disabled.");
                } else {
                    ctx.success("🔒 Encryption system enabled.");
                }
            },
        }
        Ok(())
    }
}
