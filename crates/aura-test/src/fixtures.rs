//! Ready-wired stores, file systems and terminals.

use std::sync::{Arc, Once};

use aura_storage::{FileKvStore, KvStore, MemoryKvStore};
use aura_terminal::{
    CommandDispatcher, OutputKind, OutputRecord, Session, TerminalSettings,
};
use aura_vfs::{VfsSettings, VirtualFileSystem};
use tempfile::TempDir;

use crate::mocks::RecordingLauncher;

static LOGGING: Once = Once::new();

/// Install a test-writer tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A fresh in-memory store behind the trait object the core expects.
#[must_use]
pub fn memory_store() -> Arc<dyn KvStore> {
    Arc::new(MemoryKvStore::new())
}

/// An on-disk store in a temporary directory.
///
/// Keep the [`TempDir`] alive for as long as the store is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn temp_file_store() -> (TempDir, Arc<dyn KvStore>) {
    let dir = TempDir::new().expect("create temp dir");
    let store = FileKvStore::open(dir.path().join("store")).expect("open file store");
    (dir, Arc::new(store))
}

/// A terminal wired to one store, with instant effects and a recording
/// launcher.
pub struct TestTerminal {
    /// The shared store.
    pub store: Arc<dyn KvStore>,
    /// The file system view.
    pub vfs: Arc<VirtualFileSystem>,
    /// The session.
    pub session: Arc<Session>,
    /// Records launches.
    pub launcher: RecordingLauncher,
    /// The dispatcher under test.
    pub dispatcher: CommandDispatcher,
}

impl TestTerminal {
    /// A terminal over a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(memory_store())
    }

    /// A terminal over `store`, with [`TerminalSettings::instant`].
    #[must_use]
    pub fn with_store(store: Arc<dyn KvStore>) -> Self {
        Self::with_settings(store, TerminalSettings::instant())
    }

    /// A terminal over `store` with explicit settings.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be read.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_settings(store: Arc<dyn KvStore>, settings: TerminalSettings) -> Self {
        init_test_logging();
        let vfs = Arc::new(
            VirtualFileSystem::new(Arc::clone(&store), VfsSettings::default())
                .expect("load file system"),
        );
        let session = Arc::new(Session::load(Arc::clone(&store), &settings).expect("load session"));
        let launcher = RecordingLauncher::new();
        let dispatcher = CommandDispatcher::new(
            Arc::clone(&vfs),
            Arc::clone(&session),
            Arc::new(launcher.clone()),
            settings,
        );
        Self {
            store,
            vfs,
            session,
            launcher,
            dispatcher,
        }
    }

    /// Run a line and collect its output.
    pub async fn run(&self, line: &str) -> Vec<OutputRecord> {
        self.dispatcher.run_collect(line).await
    }

    /// Run a line and return only the record kinds.
    pub async fn kinds(&self, line: &str) -> Vec<OutputKind> {
        self.run(line).await.into_iter().map(|r| r.kind).collect()
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// A dispatcher over a fresh in-memory store with instant effects.
#[must_use]
pub fn instant_dispatcher() -> CommandDispatcher {
    TestTerminal::new().dispatcher
}
