//! `font`: show or set the font size.

use crate::{Command, CommandContext, CommandResult, FontSize, SessionPatch};

/// Sets the session font size.
pub struct FontCommand;

#[async_trait::async_trait]
impl Command for FontCommand {
    fn name(&self) -> &'static str {
        "font"
    }

    fn description(&self) -> &'static str {
        "Change font size (small/medium/large)"
    }

    fn usage(&self) -> &'static str {
        "font [small|medium|large]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let available = FontSize::ALL.map(FontSize::as_str).join(", ");
        let current = ctx.session.get().font_size;

        let Some(arg) = args.first() else {
            let examples: Vec<String> = FontSize::ALL
                .iter()
                .map(|s| format!("  font {:<8} {}px", s.as_str(), s.pixels()))
                .collect();
            ctx.info(format!(
                "Current font size: {current}\nAvailable sizes: {available}\n\nUsage: font <size>\n{}",
                examples.join("\n")
            ));
            return Ok(());
        };

        let Ok(size) = arg.parse::<FontSize>() else {
            ctx.error(format!(
                "Invalid font size: {}\nAvailable sizes: {available}",
                arg.to_ascii_lowercase()
            ));
            return Ok(());
        };

        ctx.session.update(SessionPatch {
            font_size: Some(size),
            ..SessionPatch::default()
        })?;
        ctx.success(format!(
            "🔤 Font size changed from {current} to {size} ({}px)",
            size.pixels()
        ));
        Ok(())
    }
}
