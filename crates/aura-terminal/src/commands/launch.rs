//! `launch`: open an application through the launcher collaborator.

use serde_json::json;
use tracing::debug;

use crate::{Command, CommandContext, CommandResult, SessionPatch};

/// Validates an app id, records it as open and hands it to the launcher.
///
/// An optional second argument names a file to open in the app.
pub struct LaunchCommand;

#[async_trait::async_trait]
impl Command for LaunchCommand {
    fn name(&self) -> &'static str {
        "launch"
    }

    fn description(&self) -> &'static str {
        "Launch an application"
    }

    fn usage(&self) -> &'static str {
        "launch <app> [file]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        let available = ctx.settings.apps.join(", ");
        let Some(app) = args.first().map(|a| a.to_ascii_lowercase()) else {
            ctx.error(format!("Usage: launch <app>\nAvailable apps: {available}"));
            return Ok(());
        };
        if !ctx.settings.is_known_app(&app) {
            ctx.error(format!(
                "Unknown application: {app}\nAvailable apps: {available}"
            ));
            return Ok(());
        }

        let payload = match args.get(1) {
            Some(file) => {
                let (dir, name) = ctx.resolve_file(file)?;
                Some(json!({ "file": name, "path": dir }))
            },
            None => None,
        };

        let mut open_apps = ctx.session.get().open_apps;
        if !open_apps.contains(&app) {
            open_apps.push(app.clone());
            ctx.session.update(SessionPatch {
                open_apps: Some(open_apps),
                ..SessionPatch::default()
            })?;
        }

        ctx.success(format!("🚀 Launching {app}..."));
        debug!(app = %app, has_payload = payload.is_some(), "launching app");
        ctx.launcher.launch(&app, payload);
        Ok(())
    }
}
