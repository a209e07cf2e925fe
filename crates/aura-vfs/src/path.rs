//! Directory path arithmetic.
//!
//! Directories are always absolute, `/`-delimited and end in `/`; the root
//! is `/`. Everything here is lexical: no record lookups happen.

use crate::{VfsError, VfsResult};

/// The root directory.
pub const ROOT: &str = "/";

/// Normalize any directory spelling into canonical form.
///
/// Empty segments and `.` are dropped, `..` pops (clamped at root), and the
/// result always starts and ends with `/`.
#[must_use]
pub fn normalize_dir(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            other => parts.push(other),
        }
    }
    from_segments(&parts)
}

/// Parent of `dir`, or `None` at root.
#[must_use]
pub fn parent_dir(dir: &str) -> Option<String> {
    let mut parts = segments(dir);
    parts.pop()?;
    Some(from_segments(&parts))
}

/// Child directory `name` inside `parent`.
#[must_use]
pub fn join_dir(parent: &str, name: &str) -> String {
    normalize_dir(&format!("{}{}", normalize_dir(parent), name.trim()))
}

/// Resolve a `cd`-style target against `cwd`.
///
/// Accepts absolute paths, `~` and `~/...` (relative to `home`), `.`, `..`
/// and relative names.
///
/// # Errors
///
/// Returns [`VfsError::Validation`] if the target climbs above the root.
pub fn resolve_dir(cwd: &str, target: &str, home: &str) -> VfsResult<String> {
    let target = target.trim();
    let (base, rest) = if target.is_empty() || target == "~" {
        (normalize_dir(home), "")
    } else if let Some(rest) = target.strip_prefix("~/") {
        (normalize_dir(home), rest)
    } else if target.starts_with('/') {
        (ROOT.to_owned(), target)
    } else {
        (normalize_dir(cwd), target)
    };

    let mut parts = segments(&base);
    for segment in rest.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if parts.pop().is_none() {
                    return Err(VfsError::Validation(
                        "cannot go above the root directory".into(),
                    ));
                }
            },
            other => parts.push(other),
        }
    }
    Ok(from_segments(&parts))
}

/// Split a file argument into `(directory, file name)` relative to `cwd`.
///
/// The directory part is resolved like [`resolve_dir`].
///
/// # Errors
///
/// Returns [`VfsError::Validation`] if the argument has no file name part.
pub fn split_file_path(cwd: &str, target: &str, home: &str) -> VfsResult<(String, String)> {
    let target = target.trim();
    let (dir_part, name) = match target.rfind('/') {
        Some(idx) => (&target[..=idx], &target[idx.saturating_add(1)..]),
        None => ("", target),
    };
    if name.is_empty() || name == "." || name == ".." {
        return Err(VfsError::Validation(format!(
            "'{target}' does not name a file"
        )));
    }
    let dir = if dir_part.is_empty() {
        normalize_dir(cwd)
    } else {
        resolve_dir(cwd, dir_part, home)?
    };
    Ok((dir, name.to_owned()))
}

/// Human form of a directory: no trailing slash except for root.
#[must_use]
pub fn display_dir(dir: &str) -> String {
    let normalized = normalize_dir(dir);
    match normalized.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_owned(),
        _ => ROOT.to_owned(),
    }
}

/// Whether `dir` equals `ancestor` or lies beneath it.
#[must_use]
pub fn is_within(dir: &str, ancestor: &str) -> bool {
    dir.starts_with(ancestor)
}

fn segments(dir: &str) -> Vec<&str> {
    dir.split('/').filter(|s| !s.is_empty()).collect()
}

fn from_segments(parts: &[&str]) -> String {
    if parts.is_empty() {
        ROOT.to_owned()
    } else {
        format!("/{}/", parts.join("/"))
    }
}
