//! Built-in terminal commands, one module per command.

mod cat;
mod cd;
mod clear;
mod encrypt;
mod find;
mod font;
mod help;
mod history;
mod launch;
mod ls;
mod matrix;
mod mkdir;
mod neo;
mod neural;
mod pwd;
mod quantum;
mod rm;
mod rmdir;
mod settings;
mod status;
mod system;
mod theme;
mod touch;
mod write;

pub use cat::CatCommand;
pub use cd::CdCommand;
pub use clear::ClearCommand;
pub use encrypt::EncryptCommand;
pub use find::FindCommand;
pub use font::FontCommand;
pub use help::HelpCommand;
pub use history::HistoryCommand;
pub use launch::LaunchCommand;
pub use ls::LsCommand;
pub use matrix::MatrixCommand;
pub use mkdir::MkdirCommand;
pub use neo::NeoCommand;
pub use neural::NeuralCommand;
pub use pwd::PwdCommand;
pub use quantum::QuantumCommand;
pub use rm::RmCommand;
pub use rmdir::RmdirCommand;
pub use settings::SettingsCommand;
pub use status::StatusCommand;
pub use system::SystemCommand;
pub use theme::ThemeCommand;
pub use touch::TouchCommand;
pub use write::WriteCommand;

/// Lowercased first argument, or `default` when there is none.
fn action(args: &[String], default: &str) -> String {
    args.first()
        .map_or_else(|| default.to_owned(), |a| a.to_ascii_lowercase())
}

/// Last path segment of a canonical directory.
fn dir_name(dir: &str) -> &str {
    dir.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

/// Render a byte count the way `ls` does.
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes_as_f64(bytes) / 1024.0)
    } else {
        format!("{:.1} MB", bytes_as_f64(bytes) / (1024.0 * 1024.0))
    }
}

#[allow(clippy::cast_precision_loss)]
fn bytes_as_f64(bytes: u64) -> f64 {
    bytes as f64
}
