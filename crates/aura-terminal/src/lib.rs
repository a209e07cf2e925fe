//! Aura Terminal: the command dispatcher and its session.
//!
//! A [`CommandDispatcher`] turns one submitted line into zero or more
//! [`OutputRecord`]s, mutating the [`VirtualFileSystem`] and the injected
//! [`Session`] along the way. Lines may chain several commands with `&&`;
//! every segment runs, in order, even when an earlier one fails.
//!
//! Commands are values implementing [`Command`], collected in a static
//! [`CommandRegistry`] built once at startup. Handlers never panic across
//! the dispatch loop: an `Err` becomes a single `error` record.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use aura_storage::{KvStore, MemoryKvStore};
//! use aura_terminal::{CommandDispatcher, NoopLauncher, OutputKind, Session, TerminalSettings};
//! use aura_vfs::{VfsSettings, VirtualFileSystem};
//!
//! let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
//! let settings = TerminalSettings::instant();
//! let vfs = Arc::new(VirtualFileSystem::new(Arc::clone(&store), VfsSettings::default()).unwrap());
//! let session = Arc::new(Session::load(store, &settings).unwrap());
//! let dispatcher = CommandDispatcher::new(vfs, session, Arc::new(NoopLauncher), settings);
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
//! let records = runtime.block_on(dispatcher.run_collect("theme light && pwd"));
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0].kind, OutputKind::Success);
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod completion;
pub mod dispatcher;
pub mod effects;
pub mod launcher;
pub mod output;
pub mod session;
pub mod settings;

pub use dispatcher::CommandDispatcher;
pub use launcher::{AppLauncher, NoopLauncher};
pub use output::{OutputKind, OutputLog, OutputRecord, OutputSink};
pub use session::{
    FontSize, QuantumState, Session, SessionPatch, SessionState, SystemInfo, Theme,
};
pub use settings::TerminalSettings;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use aura_storage::StorageError;
use aura_vfs::{VfsError, VfsResult, VirtualFileSystem, path};

/// Command execution errors.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The arguments do not fit the command.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A file system operation failed.
    #[error("{0}")]
    Vfs(#[from] VfsError),

    /// Session state could not be persisted.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A value could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type for command execution.
pub type CommandResult = Result<(), CommandError>;

/// A named terminal command.
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Lowercase name the command is invoked by.
    fn name(&self) -> &'static str;

    /// One-line description for `help`.
    fn description(&self) -> &'static str;

    /// Usage synopsis.
    fn usage(&self) -> &'static str;

    /// Run the command. Output goes through `ctx`; an `Err` is reported by
    /// the dispatcher as one `error` record.
    async fn execute(&self, args: &[String], ctx: &CommandContext<'_>) -> CommandResult;
}

/// Everything a command may touch while it runs.
pub struct CommandContext<'a> {
    /// The file system view.
    pub vfs: &'a VirtualFileSystem,
    /// Session state.
    pub session: &'a Session,
    /// App-launcher collaborator.
    pub launcher: &'a dyn AppLauncher,
    /// Terminal tunables.
    pub settings: &'a TerminalSettings,
    /// The registry the command was found in.
    pub registry: &'a CommandRegistry,
    sink: &'a dyn OutputSink,
}

impl<'a> CommandContext<'a> {
    /// Assemble a context.
    #[must_use]
    pub fn new(
        vfs: &'a VirtualFileSystem,
        session: &'a Session,
        launcher: &'a dyn AppLauncher,
        settings: &'a TerminalSettings,
        registry: &'a CommandRegistry,
        sink: &'a dyn OutputSink,
    ) -> Self {
        Self {
            vfs,
            session,
            launcher,
            settings,
            registry,
            sink,
        }
    }

    /// Emit one output record.
    pub fn emit(&self, kind: OutputKind, content: impl Into<String>) {
        self.sink.emit(OutputRecord::new(kind, content));
    }

    /// Emit an `info` record.
    pub fn info(&self, content: impl Into<String>) {
        self.emit(OutputKind::Info, content);
    }

    /// Emit a `success` record.
    pub fn success(&self, content: impl Into<String>) {
        self.emit(OutputKind::Success, content);
    }

    /// Emit a `warning` record.
    pub fn warning(&self, content: impl Into<String>) {
        self.emit(OutputKind::Warning, content);
    }

    /// Emit an `error` record.
    pub fn error(&self, content: impl Into<String>) {
        self.emit(OutputKind::Error, content);
    }

    /// Empty the output log.
    pub fn clear_output(&self) {
        self.sink.clear();
    }

    /// Suspend for a nominal effect delay, scaled by the effect speed.
    pub async fn pause(&self, nominal_ms: u64) {
        let delay = self.settings.effect_delay(nominal_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// The session's working directory.
    #[must_use]
    pub fn cwd(&self) -> String {
        self.session.get().current_directory
    }

    /// Whether `dir` is a built-in directory or has a folder record.
    #[must_use]
    pub fn dir_exists(&self, dir: &str) -> bool {
        self.settings.is_system_path(dir) || self.vfs.folder_exists(dir)
    }

    /// Resolve a directory argument against the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Validation`] if the target climbs above the root.
    pub fn resolve_dir(&self, target: &str) -> VfsResult<String> {
        path::resolve_dir(&self.cwd(), target, &self.settings.home_directory)
    }

    /// Split a file argument into `(directory, name)`.
    ///
    /// # Errors
    ///
    /// Returns [`VfsError::Validation`] if the argument names no file.
    pub fn resolve_file(&self, target: &str) -> VfsResult<(String, String)> {
        path::split_file_path(&self.cwd(), target, &self.settings.home_directory)
    }
}

/// Registry of commands for lookup by name or alias.
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Arc<dyn Command>>,
    aliases: HashMap<String, &'static str>,
}

impl CommandRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Create a registry with every built-in command registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        use commands::{
            CatCommand, CdCommand, ClearCommand, EncryptCommand, FindCommand, FontCommand,
            HelpCommand, HistoryCommand, LaunchCommand, LsCommand, MatrixCommand, MkdirCommand,
            NeoCommand, NeuralCommand, PwdCommand, QuantumCommand, RmCommand, RmdirCommand,
            SettingsCommand, StatusCommand, SystemCommand, ThemeCommand, TouchCommand,
            WriteCommand,
        };

        let mut registry = Self::new();
        registry.register(Arc::new(HelpCommand));
        registry.register(Arc::new(ClearCommand));
        registry.register(Arc::new(LsCommand));
        registry.register(Arc::new(CdCommand));
        registry.register(Arc::new(PwdCommand));
        registry.register(Arc::new(TouchCommand));
        registry.register(Arc::new(MkdirCommand));
        registry.register(Arc::new(LaunchCommand));
        registry.register(Arc::new(ThemeCommand));
        registry.register(Arc::new(FontCommand));
        registry.register(Arc::new(EncryptCommand));
        registry.register(Arc::new(SettingsCommand));
        registry.register(Arc::new(SystemCommand));
        registry.register(Arc::new(StatusCommand));
        registry.register(Arc::new(NeuralCommand));
        registry.register(Arc::new(QuantumCommand));
        registry.register(Arc::new(MatrixCommand));
        registry.register(Arc::new(NeoCommand));
        registry.register(Arc::new(CatCommand));
        registry.register(Arc::new(RmCommand));
        registry.register(Arc::new(RmdirCommand));
        registry.register(Arc::new(WriteCommand));
        registry.register(Arc::new(FindCommand));
        registry.register(Arc::new(HistoryCommand));
        registry.alias("open", "launch");
        registry.alias("run", "launch");
        registry
    }

    /// Register a command under its own name.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.insert(command.name(), command);
    }

    /// Make `alias` resolve to the registered command `target`.
    ///
    /// Aliases to unknown targets are ignored.
    pub fn alias(&mut self, alias: &str, target: &str) {
        if let Some((&name, _)) = self.commands.get_key_value(target) {
            self.aliases.insert(alias.to_ascii_lowercase(), name);
        }
    }

    /// Look up a command by name or alias, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        let name = name.to_ascii_lowercase();
        let key = self
            .aliases
            .get(name.as_str())
            .copied()
            .unwrap_or(name.as_str());
        self.commands.get(key).map(AsRef::as_ref)
    }

    /// Registered commands, sorted by name.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.values().map(AsRef::as_ref)
    }

    /// Every invocable name (commands and aliases), sorted.
    #[must_use]
    pub fn invocable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .commands
            .keys()
            .copied()
            .chain(self.aliases.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names
    }

    /// Aliases that resolve to `name`, sorted.
    #[must_use]
    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| **target == name)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Number of registered commands, excluding aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = CommandRegistry::with_defaults();
        for name in [
            "help", "clear", "ls", "cd", "pwd", "touch", "mkdir", "launch", "theme", "font",
            "encrypt", "settings", "system", "status", "neural", "quantum", "matrix", "neo",
            "cat", "rm", "rmdir", "write", "find", "history",
        ] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
        assert_eq!(registry.len(), 24);
        assert!(registry.get("frobnicate").is_none());
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = CommandRegistry::with_defaults();
        assert_eq!(registry.get("THEME").unwrap().name(), "theme");
    }

    #[test]
    fn test_aliases() {
        let registry = CommandRegistry::with_defaults();
        assert_eq!(registry.get("open").unwrap().name(), "launch");
        assert_eq!(registry.get("Run").unwrap().name(), "launch");
        assert_eq!(registry.aliases_of("launch"), vec!["open", "run"]);
        assert!(registry.invocable_names().contains(&"open"));
    }

    #[test]
    fn test_alias_to_unknown_ignored() {
        let mut registry = CommandRegistry::new();
        registry.alias("x", "nothing");
        assert!(registry.get("x").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_every_command_documents_itself() {
        let registry = CommandRegistry::with_defaults();
        for command in registry.commands() {
            assert!(!command.description().is_empty());
            assert!(command.usage().starts_with(command.name()));
        }
    }
}
