//! Tab completion.
//!
//! The first word completes against command names; later words complete
//! against file and folder names in the working directory. Matching is a
//! case-insensitive prefix, and only a single match completes.

use std::collections::BTreeSet;

use aura_vfs::path::parent_dir;

use crate::CommandDispatcher;

/// Names a word could complete to: command names for the first word of a
/// command, directory entries otherwise.
///
/// Directory names (built-in and folders) carry a trailing `/`.
#[must_use]
pub fn completion_candidates(dispatcher: &CommandDispatcher, first_word: bool) -> Vec<String> {
    if first_word {
        return dispatcher
            .registry()
            .invocable_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
    }
    let cwd = dispatcher.session().get().current_directory;
    let vfs = dispatcher.vfs();
    let mut dirs: BTreeSet<String> = dispatcher
        .settings()
        .system_paths
        .iter()
        .filter(|p| parent_dir(p).as_deref() == Some(cwd.as_str()))
        .filter_map(|p| p.trim_end_matches('/').rsplit('/').next())
        .map(|name| format!("{name}/"))
        .collect();
    dirs.extend(
        vfs.folders_in_path(&cwd)
            .into_iter()
            .map(|f| format!("{}/", f.name)),
    );
    dirs.into_iter()
        .chain(vfs.files_in_path(&cwd).into_iter().map(|f| f.name))
        .collect()
}

/// Candidates starting with `prefix`, ignoring case.
#[must_use]
pub fn matching<'a>(candidates: &'a [String], prefix: &str) -> Vec<&'a str> {
    let prefix = prefix.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&prefix))
        .map(String::as_str)
        .collect()
}

/// Every match for the last word of `line`.
///
/// Returns the byte offset where that word starts, and the candidates that
/// could replace it.
#[must_use]
pub fn suggestions(dispatcher: &CommandDispatcher, line: &str) -> (usize, Vec<String>) {
    let (head, word) = split_last_word(line);
    // Only the text after the last `&&` decides whether this is a command name.
    let segment = head.rsplit(crate::dispatcher::CHAIN_TOKEN).next().unwrap_or(head);
    let first_word = segment.trim().is_empty();

    let candidates = completion_candidates(dispatcher, first_word);
    let matches = matching(&candidates, word)
        .into_iter()
        .map(str::to_owned)
        .collect();
    (head.len(), matches)
}

/// Complete the last word of `line`.
///
/// Returns the whole line with the word replaced, or `None` when there is
/// no match or more than one.
#[must_use]
pub fn complete(dispatcher: &CommandDispatcher, line: &str) -> Option<String> {
    let (start, matches) = suggestions(dispatcher, line);
    match matches.as_slice() {
        [only] => Some(format!("{}{only}", line.get(..start)?)),
        _ => None,
    }
}

/// Split `line` into everything before the last word, and the last word.
fn split_last_word(line: &str) -> (&str, &str) {
    let word_start = line
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(idx, c)| idx.saturating_add(c.len_utf8()));
    line.split_at(word_start)
}
