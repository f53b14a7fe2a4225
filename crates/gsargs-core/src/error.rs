// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for gsargs.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all gsargs operations.
#[derive(Debug, Error)]
pub enum GsError {
    // -- Parameter validation --
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("conformance violation: {0}")]
    ConformanceViolation(String),

    #[error("unsupported selection: {1}")]
    UnsupportedSelection(Selection, String),

    // -- Engine --
    #[error("engine failed: {0}")]
    Engine(String),

    // -- Storage / persistence --
    #[error("settings error: {0}")]
    Settings(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GsError>;

/// The choice behind a [`GsError::UnsupportedSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// No output device, or one outside the catalog.
    Device,
    /// The device writes a file but none was named.
    OutputFile,
    /// No input document.
    Input,
    /// A debug switch the engine does not know.
    DebugSwitch,
    /// Options from model tiers that cannot be combined.
    ModelKind,
    /// Display output from an engine that cannot hand back pages.
    DisplayOutput,
    /// A display buffer layout that cannot be converted.
    DisplayFormat,
}
