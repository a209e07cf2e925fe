//! Well-known logical keys.
//!
//! These names match what earlier browser builds wrote to local storage, so
//! exported data stays readable.

/// File record collection.
pub const FILES: &str = "fileSystem";

/// Folder record collection.
pub const FOLDERS: &str = "folderSystem";

/// Recently opened files, most recent first.
pub const RECENT_FILES: &str = "recentFiles";

/// Terminal session state.
pub const TERMINAL_STATE: &str = "aura-terminal-state";
