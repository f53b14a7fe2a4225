// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gsargs — Core types, error definitions and settings shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{AppSettings, JsonSettingsStore, SettingsStore};
pub use error::{GsError, Selection};
pub use types::*;
