// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Path canonicalization for the engine.
//
// The engine wants forward slashes on every platform and is picky about
// doubled separators, so paths are rewritten before they become tokens.

use std::fs;
use std::path::{Component, Path, PathBuf};

use gsargs_core::error::{GsError, Result};
use tracing::debug;

/// Rewrite `path` with single forward slashes.
///
/// Backslashes become `/`, runs of separators collapse to one, and a
/// trailing separator is dropped unless it is the root itself.
pub fn canonicalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut last_was_sep = false;
    for c in path.chars() {
        let is_sep = c == '/' || c == '\\';
        if is_sep {
            if !last_was_sep {
                out.push('/');
            }
        } else {
            out.push(c);
        }
        last_was_sep = is_sep;
    }
    if out.len() > 1 && out.ends_with('/') && !is_drive_root(&out) {
        out.pop();
    }
    out
}

/// `C:/` keeps its slash; `C:` alone means the drive's current directory.
fn is_drive_root(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Comparison key used to de-duplicate canonical paths.
pub(crate) fn path_key(canonical: &str) -> String {
    if cfg!(windows) {
        canonical.to_lowercase()
    } else {
        canonical.to_string()
    }
}

/// Directory part of a canonical path, if any.
///
/// A root keeps its slash, so the parent of `C:/sRGB.icc` is `C:/`.
pub(crate) fn parent_dir(canonical: &str) -> Option<&str> {
    let idx = canonical.rfind('/')?;
    let with_slash = &canonical[..=idx];
    if idx == 0 || is_drive_root(with_slash) {
        Some(with_slash)
    } else {
        Some(&canonical[..idx])
    }
}

/// Expand `path` to an absolute path and require that it exists.
///
/// Unless `ignore_case_match` is set, every component must match a directory
/// entry exactly, so `Profile.ICC` does not satisfy `profile.icc` even on a
/// case-insensitive file system.
pub fn resolve_existing(path: impl AsRef<Path>, ignore_case_match: bool) -> Result<String> {
    let raw = path.as_ref();
    let absolute = normalize_lexically(&std::path::absolute(raw)?);

    if !absolute.exists() {
        return Err(GsError::FileNotFound(absolute));
    }
    if !ignore_case_match && !matches_case_exactly(&absolute) {
        debug!(path = %absolute.display(), "path exists but case differs");
        return Err(GsError::FileNotFound(absolute));
    }

    Ok(canonicalize(&absolute.to_string_lossy()))
}

/// Resolve `.` and `..` without touching the file system.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn matches_case_exactly(absolute: &Path) -> bool {
    let mut current = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Normal(name) => {
                let found = fs::read_dir(&current)
                    .map(|entries| {
                        entries
                            .filter_map(|entry| entry.ok())
                            .any(|entry| entry.file_name() == name)
                    })
                    .unwrap_or(false);
                if !found {
                    return false;
                }
                current.push(name);
            }
            other => current.push(other.as_os_str()),
        }
    }
    true
}
