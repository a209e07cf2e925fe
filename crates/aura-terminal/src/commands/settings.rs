//! `settings`: inspect and edit session settings.

use chrono::Utc;
use serde_json::Value;

use super::action;
use crate::{
    Command, CommandContext, CommandError, CommandResult, FontSize, SessionPatch, SessionState,
    Theme,
};

/// Keys `settings set` accepts, with their allowed values.
const SETTABLE: &[(&str, &[&str])] = &[
    ("theme", &["light", "dark", "glassy"]),
    ("fontSize", &["small", "medium", "large"]),
    ("encryptionEnabled", &["true", "false"]),
    ("isNeuralActive", &["true", "false"]),
];

/// Version tag written into `settings export`.
const EXPORT_VERSION: &str = "1.0";

/// Session settings management.
pub struct SettingsCommand;

fn settable_keys() -> String {
    SETTABLE
        .iter()
        .map(|(k, _)| *k)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serialized view of the session, keyed by the persisted field names.
fn state_value(state: &SessionState) -> Result<serde_json::Map<String, Value>, CommandError> {
    match serde_json::to_value(state)? {
        Value::Object(map) => Ok(map),
        _ => Err(CommandError::Other("session state is not an object".into())),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build the patch for a validated `key = value`.
fn patch_for(key: &str, value: &str) -> Option<SessionPatch> {
    let mut patch = SessionPatch::default();
    match key {
        "theme" => patch.theme = Some(value.parse::<Theme>().ok()?),
        "fontSize" => patch.font_size = Some(value.parse::<FontSize>().ok()?),
        "encryptionEnabled" => patch.encryption_enabled = Some(value.parse().ok()?),
        "isNeuralActive" => patch.is_neural_active = Some(value.parse().ok()?),
        _ => return None,
    }
    Some(patch)
}

fn list(ctx: &CommandContext<'_>) {
    let s = ctx.session.get();
    ctx.info(format!(
        "⚙️  Aura OS SYSTEM SETTINGS:

Display:
  theme: {}
  fontSize: {}
Security:
  encryptionEnabled: {}
Neural:
  isNeuralActive: {}
  quantumState: {}
System:
  currentDirectory: {}
  openApps: {} active
  commandHistory: {} entries

Usage:
  settings get <key>        Get a setting value
  settings set <key> <val>  Set a setting value
  settings reset            Reset to defaults
  settings export           Print settings as JSON
  settings ui               Open the settings interface",
        s.theme,
        s.font_size,
        s.encryption_enabled,
        s.is_neural_active,
        s.quantum_state,
        s.current_directory,
        s.open_apps.len(),
        s.command_history.len(),
    ));
}

fn get(ctx: &CommandContext<'_>, key: Option<&String>) -> CommandResult {
    let Some(key) = key else {
        ctx.error(format!(
            "Usage: settings get <key>\nAvailable keys: {}",
            settable_keys()
        ));
        return Ok(());
    };
    let state = state_value(&ctx.session.get())?;
    match state.get(key.as_str()) {
        Some(value) => ctx.success(format!("{key} = {}", render(value))),
        None => ctx.error(format!("Unknown setting: {key}")),
    }
    Ok(())
}

fn set(ctx: &CommandContext<'_>, key: Option<&String>, value: Option<&String>) -> CommandResult {
    let (Some(key), Some(value)) = (key, value) else {
        ctx.error("Usage: settings set <key> <value>\nExample: settings set theme dark");
        return Ok(());
    };
    let Some((_, allowed)) = SETTABLE.iter().find(|(k, _)| *k == key.as_str()) else {
        ctx.error(format!(
            "Unknown setting: {key}\nValid settings: {}",
            settable_keys()
        ));
        return Ok(());
    };
    let value = value.to_ascii_lowercase();
    let patch = match patch_for(key, &value) {
        Some(patch) if allowed.contains(&value.as_str()) => patch,
        _ => {
            ctx.error(format!(
                "Invalid value for {key}: {value}\nValid values: {}",
                allowed.join(", ")
            ));
            return Ok(());
        },
    };

    let before = state_value(&ctx.session.get())?;
    let old = before.get(key.as_str()).map(render).unwrap_or_default();
    ctx.session.update(patch)?;
    ctx.success(format!(
        "✅ Setting updated: {key} changed from {old} to {value}"
    ));
    Ok(())
}

fn reset(ctx: &CommandContext<'_>) -> CommandResult {
    let s = ctx.session.reset()?;
    ctx.success(format!(
        "🔄 All settings reset to defaults:
  Theme: {}
  Font Size: {}
  Encryption: disabled
  Neural: inactive
  Quantum: {}
  Directory: {}",
        s.theme, s.font_size, s.quantum_state, s.current_directory
    ));
    Ok(())
}

fn export(ctx: &CommandContext<'_>) -> CommandResult {
    let mut data = state_value(&ctx.session.get())?;
    data.insert("exportedAt".into(), Value::String(Utc::now().to_rfc3339()));
    data.insert("version".into(), Value::String(EXPORT_VERSION.into()));
    let json = serde_json::to_string_pretty(&Value::Object(data))?;
    ctx.info(format!(
        "📤 Settings Export:\n\n{json}\n\nSettings exported successfully."
    ));
    Ok(())
}

#[async_trait::async_trait]
impl Command for SettingsCommand {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn description(&self) -> &'static str {
        "View and change system settings"
    }

    fn usage(&self) -> &'static str {
        "settings [list|get|set|reset|export|ui] [key] [value]"
    }

    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult {
        match action(args, "list").as_str() {
            "list" | "show" => list(ctx),
            "get" => get(ctx, args.get(1))?,
            "set" => set(ctx, args.get(1), args.get(2))?,
            "reset" => reset(ctx)?,
            "export" => export(ctx)?,
            "ui" | "interface" | "gui" => {
                ctx.success("🖥️  Launching Settings Interface...");
                ctx.launcher.launch("settings", None);
            },
            other => {
                ctx.error(format!(
                    "Unknown settings action: {other}\nUsage: {}",
                    self.usage()
                ));
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_for_known_keys() {
        assert_eq!(patch_for("theme", "glassy").unwrap().theme, Some(Theme::Glassy));
        assert_eq!(
            patch_for("fontSize", "small").unwrap().font_size,
            Some(FontSize::Small)
        );
        assert_eq!(
            patch_for("isNeuralActive", "true").unwrap().is_neural_active,
            Some(true)
        );
        assert!(patch_for("theme", "neon").is_none());
        assert!(patch_for("currentDirectory", "/").is_none());
    }

    #[test]
    fn test_state_value_uses_persisted_names() {
        let map = state_value(&SessionState::default()).unwrap();
        assert_eq!(render(&map["fontSize"]), "medium");
        assert_eq!(render(&map["encryptionEnabled"]), "false");
        assert_eq!(render(&map["quantumState"]), "DORMANT");
    }

    #[test]
    fn test_settable_table_matches_patch_builder() {
        for (key, values) in SETTABLE {
            for value in *values {
                assert!(patch_for(key, value).is_some(), "{key}={value}");
            }
        }
    }
}
