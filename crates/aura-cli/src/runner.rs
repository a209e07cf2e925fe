//! Runs submitted lines as background tasks.
//!
//! Each line gets its own task, so a long effect sequence never holds up the
//! next line. Before re-prompting the REPL waits a short grace period, which
//! lets quick commands such as `cd` finish and update the prompt first.

use std::sync::Arc;
use std::time::Duration;

use aura_terminal::{CommandDispatcher, OutputSink};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, warn};

/// How long the REPL waits for in-flight lines before showing the prompt.
pub(crate) const PROMPT_GRACE: Duration = Duration::from_millis(150);

/// Owns the tasks of every line still running.
pub(crate) struct LineRunner {
    dispatcher: Arc<CommandDispatcher>,
    sink: Arc<dyn OutputSink>,
    tasks: JoinSet<()>,
}

impl LineRunner {
    /// Create a runner sending all output to `sink`.
    pub(crate) fn new(dispatcher: Arc<CommandDispatcher>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            dispatcher,
            sink,
            tasks: JoinSet::new(),
        }
    }

    /// Start running `line` without waiting for it.
    pub(crate) fn submit(&mut self, line: String) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let sink = Arc::clone(&self.sink);
        self.tasks.spawn(async move {
            dispatcher.run(&line, sink.as_ref()).await;
        });
    }

    /// Number of lines still running.
    pub(crate) fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Reap finished lines, waiting at most `grace` for the rest.
    pub(crate) async fn settle(&mut self, grace: Duration) {
        let reap = async {
            while let Some(joined) = self.tasks.join_next().await {
                log_join(joined);
            }
        };
        if tokio::time::timeout(grace, reap).await.is_err() {
            debug!(in_flight = self.tasks.len(), "lines still running");
        }
    }

    /// Abort every line still running.
    pub(crate) fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            debug!(in_flight = self.tasks.len(), "aborting running lines");
        }
        self.tasks.abort_all();
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined
        && e.is_panic()
    {
        warn!(error = %e, "command task panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_storage::{KvStore, MemoryKvStore};
    use aura_terminal::{NoopLauncher, OutputLog, Session, TerminalSettings};
    use aura_vfs::{VfsSettings, VirtualFileSystem};

    fn runner(log: &Arc<OutputLog>) -> LineRunner {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let settings = TerminalSettings::default();
        let vfs = Arc::new(
            VirtualFileSystem::new(Arc::clone(&store), VfsSettings::default()).unwrap(),
        );
        let session = Arc::new(Session::load(store, &settings).unwrap());
        let dispatcher = Arc::new(CommandDispatcher::new(
            vfs,
            session,
            Arc::new(NoopLauncher),
            settings,
        ));
        LineRunner::new(dispatcher, Arc::clone(log) as Arc<dyn OutputSink>)
    }

    fn contents(log: &OutputLog) -> Vec<String> {
        log.records().into_iter().map(|r| r.content).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_line_runs_while_effect_plays() {
        let log = Arc::new(OutputLog::new(500));
        let mut runner = runner(&log);

        runner.submit("matrix".into());
        runner.submit("pwd".into());
        runner.settle(Duration::from_millis(10)).await;

        assert_eq!(runner.in_flight(), 1);
        let out = contents(&log);
        assert!(out.iter().any(|c| c.contains("Initializing Matrix")));
        assert!(out.iter().any(|c| c == "/home/aura"));
        assert!(!out.iter().any(|c| c.contains("ENTERING THE MATRIX")));

        runner.settle(Duration::from_secs(600)).await;
        assert_eq!(runner.in_flight(), 0);
        assert!(contents(&log).iter().any(|c| c.contains("ENTERING THE MATRIX")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_line_settles_within_grace() {
        let log = Arc::new(OutputLog::new(500));
        let mut runner = runner(&log);

        runner.submit("cd documents".into());
        runner.settle(PROMPT_GRACE).await;

        assert_eq!(runner.in_flight(), 0);
        assert_eq!(
            runner.dispatcher.session().get().current_directory,
            "/home/aura/documents/"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_aborts_running_lines() {
        let log = Arc::new(OutputLog::new(500));
        let mut runner = runner(&log);

        runner.submit("quantum".into());
        runner.settle(Duration::from_millis(10)).await;
        assert_eq!(runner.in_flight(), 1);

        runner.shutdown();
        runner.settle(Duration::from_millis(10)).await;
        assert_eq!(runner.in_flight(), 0);
    }
}
