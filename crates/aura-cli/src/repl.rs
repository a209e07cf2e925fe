//! Rustyline-based REPL editor with history and completion.
//!
//! The editor blocks while it waits for input, so it lives on its own
//! thread. [`LineReader`] hands it a prompt and awaits the next event.

use std::sync::{Arc, mpsc};

use anyhow::Context as _;

use aura_terminal::{CommandDispatcher, completion};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::{
    CompletionType, Config, Context, EditMode, Editor, Helper, Highlighter, Validator,
};
use tokio::sync::{mpsc as async_mpsc, oneshot};

/// Events returned by the REPL editor.
#[derive(Debug)]
pub(crate) enum ReadlineEvent {
    /// A line of input.
    Line(String),
    /// The user pressed Ctrl+C, cancelling current input.
    Interrupted,
    /// The user pressed Ctrl+D, signalling end-of-input.
    Eof,
}

/// Helper that completes command and file names and hints from history.
#[derive(Helper, Validator, Highlighter)]
struct ReplHelper {
    dispatcher: Arc<CommandDispatcher>,
    hinter: HistoryHinter,
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Some(prefix) = line.get(..pos) else {
            return Ok((pos, Vec::new()));
        };
        let (start, matches) = completion::suggestions(&self.dispatcher, prefix);
        let pairs = matches
            .into_iter()
            .map(|m| Pair {
                display: m.clone(),
                replacement: m,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

/// Rustyline-based REPL editor with command history and tab completion.
///
/// History is seeded from the persisted session rather than a history file,
/// so arrow-key navigation and the `history` command agree.
pub(crate) struct ReplEditor {
    editor: Editor<ReplHelper, DefaultHistory>,
}

impl ReplEditor {
    /// Create an editor completing against `dispatcher`.
    pub(crate) fn new(dispatcher: Arc<CommandDispatcher>) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .max_history_size(dispatcher.settings().history_limit)?
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .auto_add_history(true)
            .build();

        let history = dispatcher.session().get().command_history;
        let helper = ReplHelper {
            dispatcher,
            hinter: HistoryHinter::new(),
        };

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(helper));
        for line in &history {
            editor.add_history_entry(line.as_str())?;
        }

        Ok(Self { editor })
    }

    /// Read a line of input from the user.
    ///
    /// Returns [`ReadlineEvent::Interrupted`] on Ctrl+C and
    /// [`ReadlineEvent::Eof`] on Ctrl+D.
    pub(crate) fn readline(&mut self, prompt: &str) -> ReadlineEvent {
        match self.editor.readline(prompt) {
            Ok(line) => ReadlineEvent::Line(line),
            Err(ReadlineError::Interrupted) => ReadlineEvent::Interrupted,
            // Ctrl+D or any I/O error.
            Err(_) => ReadlineEvent::Eof,
        }
    }
}

/// Async handle to an editor running on a dedicated thread.
pub(crate) struct LineReader {
    prompts: mpsc::Sender<String>,
    events: async_mpsc::UnboundedReceiver<ReadlineEvent>,
}

impl LineReader {
    /// Start the editor thread, completing against `dispatcher`.
    pub(crate) async fn spawn(dispatcher: Arc<CommandDispatcher>) -> anyhow::Result<Self> {
        let (prompt_tx, prompt_rx) = mpsc::channel::<String>();
        let (event_tx, event_rx) = async_mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel::<anyhow::Result<()>>();

        std::thread::Builder::new()
            .name("aura-readline".into())
            .spawn(move || {
                let mut editor = match ReplEditor::new(dispatcher) {
                    Ok(editor) => {
                        let _ = ready_tx.send(Ok(()));
                        editor
                    },
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    },
                };
                while let Ok(prompt) = prompt_rx.recv() {
                    if event_tx.send(editor.readline(&prompt)).is_err() {
                        break;
                    }
                }
            })
            .context("failed to start the line editor thread")?;

        ready_rx
            .await
            .context("line editor thread exited during startup")??;
        Ok(Self {
            prompts: prompt_tx,
            events: event_rx,
        })
    }

    /// Show `prompt` and wait for the next line or control key.
    ///
    /// A dead editor thread reads as [`ReadlineEvent::Eof`].
    pub(crate) async fn read(&mut self, prompt: String) -> ReadlineEvent {
        if self.prompts.send(prompt).is_err() {
            return ReadlineEvent::Eof;
        }
        self.events.recv().await.unwrap_or(ReadlineEvent::Eof)
    }
}
