//! CLI theme and styling.

use aura_terminal::{OutputKind, OutputRecord};
use colored::Colorize;

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format the prompt for a working directory.
    pub(crate) fn prompt(cwd: &str) -> String {
        format!("{} {} ", cwd.cyan(), "❯".bold().green())
    }

    /// Format an output record. Continuation lines are indented under the
    /// marker.
    pub(crate) fn record(record: &OutputRecord) -> String {
        let text = record.content.replace('\n', "\n  ");
        match record.kind {
            OutputKind::Info => Self::info(&text),
            OutputKind::Success => Self::success(&text),
            OutputKind::Warning => Self::warning(&text),
            OutputKind::Error => Self::error(&text),
        }
    }
}

/// Print a banner for the CLI.
pub(crate) fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "{}",
        format!(
            r"
    _
   /_\  _  _ _ _ __ _
  / _ \| || | '_/ _` |
 /_/ \_\\_,_|_| \__,_|
                      v{version}
"
        )
        .cyan()
    );
    println!(
        "{}",
        "Type 'help' for commands, 'exit' to leave.".dimmed()
    );
    println!();
}
