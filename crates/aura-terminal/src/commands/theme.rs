//! `theme`: show or set the color theme.

use crate::{Command, CommandContext, CommandResult, SessionPatch, Theme};

/// Sets the session theme.
pub struct ThemeCommand;

fn available() -> String {
    Theme::ALL.map(Theme::as_str).join(", ")
}

#[async_trait::async_trait]
impl Command for ThemeCommand {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn description(&self) -> &'static str {
        "Change theme (light/dark/glassy)"
    }

    fn usage(&self) -> &'static str {
        "theme [light|dark|glassy]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let Some(arg) = args.first() else {
            ctx.info(format!(
                "Current theme: {}\nAvailable themes: {}",
                ctx.session.get().theme,
                available()
            ));
            return Ok(());
        };

        let Ok(theme) = arg.parse::<Theme>() else {
            ctx.error(format!(
                "Invalid theme: {}\nAvailable themes: {}",
                arg.to_ascii_lowercase(),
                available()
            ));
            return Ok(());
        };

        ctx.session.update(SessionPatch {
            theme: Some(theme),
            ..SessionPatch::default()
        })?;
        ctx.success(format!("🎨 Theme changed to {theme}"));
        Ok(())
    }
}
