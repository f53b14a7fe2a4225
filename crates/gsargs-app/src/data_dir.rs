// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

/// File name of the persisted settings inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Return the application data directory. It is created on first save.
pub fn data_dir() -> PathBuf {
    dirs_fallback().join("gsargs")
}

/// Default location of the settings file.
pub fn settings_path() -> PathBuf {
    data_dir().join(SETTINGS_FILE)
}

fn dirs_fallback() -> PathBuf {
    // Try XDG data dir, then APPDATA, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(appdata) = std::env::var("APPDATA") {
        return PathBuf::from(appdata);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    std::env::temp_dir()
}
