//! Line dispatch: parse, look up, execute, report.

use std::sync::Arc;

use aura_vfs::VirtualFileSystem;
use tracing::{debug, warn};

use crate::output::{OutputKind, OutputLog, OutputRecord, OutputSink};
use crate::{AppLauncher, CommandContext, CommandRegistry, Session, TerminalSettings};

/// Token that separates chained commands.
pub const CHAIN_TOKEN: &str = "&&";

/// Turns submitted lines into output records.
///
/// Cheap to share behind an `Arc`. Several lines may be in flight at once
/// (an effect sequence does not block the next line); session and file
/// system state are individually locked, so they stay consistent.
pub struct CommandDispatcher {
    vfs: Arc<VirtualFileSystem>,
    session: Arc<Session>,
    launcher: Arc<dyn AppLauncher>,
    settings: TerminalSettings,
    registry: CommandRegistry,
}

impl CommandDispatcher {
    /// Create a dispatcher with the built-in command table.
    #[must_use]
    pub fn new(
        vfs: Arc<VirtualFileSystem>,
        session: Arc<Session>,
        launcher: Arc<dyn AppLauncher>,
        settings: TerminalSettings,
    ) -> Self {
        Self::with_registry(vfs, session, launcher, settings, CommandRegistry::with_defaults())
    }

    /// Create a dispatcher with a custom command table.
    #[must_use]
    pub fn with_registry(
        vfs: Arc<VirtualFileSystem>,
        session: Arc<Session>,
        launcher: Arc<dyn AppLauncher>,
        settings: TerminalSettings,
        registry: CommandRegistry,
    ) -> Self {
        Self {
            vfs,
            session,
            launcher,
            settings,
            registry,
        }
    }

    /// The command table.
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// The session this dispatcher mutates.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The file system commands operate on.
    #[must_use]
    pub fn vfs(&self) -> &Arc<VirtualFileSystem> {
        &self.vfs
    }

    /// Terminal tunables.
    #[must_use]
    pub fn settings(&self) -> &TerminalSettings {
        &self.settings
    }

    /// Run one submitted line, sending output to `sink`.
    ///
    /// Empty input does nothing. Otherwise the whole line is appended to the
    /// history once, then each `&&` segment runs in order. A failing segment
    /// does not stop the ones after it.
    pub async fn run(&self, line: &str, sink: &dyn OutputSink) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Err(e) = self.session.push_history(line) {
            warn!(error = %e, "failed to record command history");
            sink.emit(OutputRecord::new(
                OutputKind::Error,
                format!("Failed to save command history: {e}"),
            ));
        }

        for segment in line.split(CHAIN_TOKEN).map(str::trim) {
            if segment.is_empty() {
                continue;
            }
            self.run_segment(segment, sink).await;
        }
    }

    /// Run `line` and collect everything it emits.
    pub async fn run_collect(&self, line: &str) -> Vec<OutputRecord> {
        let log = OutputLog::new(self.settings.output_limit);
        self.run(line, &log).await;
        log.drain()
    }

    async fn run_segment(&self, segment: &str, sink: &dyn OutputSink) {
        let mut words = segment.split_whitespace();
        let Some(name) = words.next().map(str::to_ascii_lowercase) else {
            return;
        };
        let args: Vec<String> = words.map(str::to_owned).collect();

        let Some(command) = self.registry.get(&name) else {
            debug!(command = %name, "unknown command");
            sink.emit(OutputRecord::new(
                OutputKind::Error,
                format!("Command not found: {name}. Type 'help' for available commands."),
            ));
            return;
        };

        let ctx = CommandContext::new(
            &self.vfs,
            &self.session,
            self.launcher.as_ref(),
            &self.settings,
            &self.registry,
            sink,
        );
        debug!(command = command.name(), args = ?args, "executing command");
        if let Err(e) = command.execute(&args, &ctx).await {
            warn!(command = command.name(), error = %e, "command failed");
            sink.emit(OutputRecord::new(
                OutputKind::Error,
                format!("Error executing {name}: {e}"),
            ));
        }
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("commands", &self.registry.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_storage::{KvStore, MemoryKvStore};
    use aura_vfs::VfsSettings;

    use crate::NoopLauncher;

    fn dispatcher() -> CommandDispatcher {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let settings = TerminalSettings::instant();
        let vfs = Arc::new(
            VirtualFileSystem::new(Arc::clone(&store), VfsSettings::default()).unwrap(),
        );
        let session = Arc::new(Session::load(store, &settings).unwrap());
        CommandDispatcher::new(vfs, session, Arc::new(NoopLauncher), settings)
    }

    #[tokio::test]
    async fn test_empty_line_is_noop() {
        let d = dispatcher();
        assert!(d.run_collect("   ").await.is_empty());
        assert!(d.session().get().command_history.is_empty());
    }

    #[tokio::test]
    async fn test_command_name_is_case_insensitive() {
        let d = dispatcher();
        let out = d.run_collect("PWD").await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].content, "/home/aura");
        assert_eq!(d.session().get().command_history, vec!["PWD"]);
    }

    #[tokio::test]
    async fn test_failed_segment_does_not_stop_chain() {
        let d = dispatcher();
        let out = d.run_collect("nope && theme light && history x && pwd").await;
        let kinds: Vec<OutputKind> = out.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OutputKind::Error,
                OutputKind::Success,
                OutputKind::Error,
                OutputKind::Info
            ]
        );
        assert!(out[2].content.starts_with("Error executing history:"));
    }

    #[tokio::test]
    async fn test_empty_segments_skipped() {
        let d = dispatcher();
        let out = d.run_collect("&& pwd &&   &&").await;
        assert_eq!(out.len(), 1);
    }

    #[tokio::test]
    async fn test_alias_dispatch() {
        let d = dispatcher();
        let out = d.run_collect("open notepad").await;
        assert_eq!(out[0].kind, OutputKind::Success);
        assert_eq!(d.session().get().open_apps, vec!["notepad"]);
    }
}
