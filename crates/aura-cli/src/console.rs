//! Stdout-backed collaborators for the dispatcher.

use aura_terminal::{AppLauncher, OutputRecord, OutputSink};
use serde_json::Value;
use tracing::info;

use crate::theme::Theme;

/// ANSI: clear screen, cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Prints each record as soon as it is emitted.
#[derive(Debug, Default)]
pub(crate) struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, record: OutputRecord) {
        println!("{}", Theme::record(&record));
    }

    fn clear(&self) {
        print!("{CLEAR_SCREEN}");
        println!("{}", Theme::dimmed("Terminal cleared"));
    }
}

/// There are no windows in a terminal; a launch is announced instead.
#[derive(Debug, Default)]
pub(crate) struct ConsoleLauncher;

impl AppLauncher for ConsoleLauncher {
    fn launch(&self, app: &str, payload: Option<Value>) {
        info!(app, ?payload, "app launched");
        println!("{}", Theme::dimmed(&launch_notice(app, payload.as_ref())));
    }
}

/// `[notepad] opened /home/aura/notes.md`, or `[settings] opened`.
fn launch_notice(app: &str, payload: Option<&Value>) -> String {
    let target = payload.and_then(|p| {
        let file = p.get("file")?.as_str()?;
        let path = p.get("path").and_then(Value::as_str).unwrap_or_default();
        Some(format!("{path}{file}"))
    });
    match target {
        Some(target) => format!("[{app}] opened {target}"),
        None => format!("[{app}] opened"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_notice() {
        let payload = serde_json::json!({"file": "notes.md", "path": "/home/aura/"});
        assert_eq!(
            launch_notice("notepad", Some(&payload)),
            "[notepad] opened /home/aura/notes.md"
        );
        assert_eq!(launch_notice("settings", None), "[settings] opened");
        let odd = serde_json::json!({"path": "/"});
        assert_eq!(launch_notice("notepad", Some(&odd)), "[notepad] opened");
    }
}
