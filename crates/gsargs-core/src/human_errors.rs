// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the surfaces that sit on top of gsargs.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how a front end presents the message.

use crate::error::{GsError, Selection};

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user must change a setting before the run can start.
    ActionRequired,
    /// The chosen combination of options cannot be produced.
    Conformance,
    /// Something outside the configuration failed (engine, disk).
    Failure,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `GsError` into a `HumanError`.
pub fn humanize_error(err: &GsError) -> HumanError {
    match err {
        GsError::DirectoryNotFound(path) => HumanError {
            message: "A folder could not be found.".into(),
            suggestion: format!(
                "Check that {} exists and is a folder, then add it again.",
                path.display()
            ),
            severity: Severity::ActionRequired,
        },

        GsError::FileNotFound(path) => HumanError {
            message: "A file could not be found.".into(),
            suggestion: format!(
                "Check the spelling (including upper and lower case) of {}.",
                path.display()
            ),
            severity: Severity::ActionRequired,
        },

        GsError::OutOfRange { field, value } => HumanError {
            message: format!("{value} is not a valid value for {field}."),
            suggestion: match *field {
                "PDFA" => "Choose PDF/A level 1, 2 or 3.".into(),
                "FirstPage" | "LastPage" => "Page numbers start at 1.".into(),
                _ => "Pick one of the values offered for this option.".into(),
            },
            severity: Severity::ActionRequired,
        },

        GsError::ConformanceViolation(detail) => HumanError {
            message: "These options cannot be combined.".into(),
            suggestion: format!(
                "PDF/X output needs the Gray or CMYK color strategy. ({detail})"
            ),
            severity: Severity::Conformance,
        },

        GsError::UnsupportedSelection(cause, detail) => humanize_selection(*cause, detail),

        GsError::Engine(detail) => HumanError {
            message: "Ghostscript reported a problem.".into(),
            suggestion: format!("Look at the engine output for details. ({detail})"),
            severity: Severity::Failure,
        },

        GsError::Settings(_) | GsError::Serialization(_) => HumanError {
            message: "Saved settings could not be read.".into(),
            suggestion: "The settings file may be damaged. Delete it to start from defaults."
                .into(),
            severity: Severity::Failure,
        },

        GsError::Io(io_err) => HumanError {
            message: "A file operation failed.".into(),
            suggestion: format!("Check permissions and free disk space. ({io_err})"),
            severity: Severity::Failure,
        },
    }
}

fn humanize_selection(cause: Selection, detail: &str) -> HumanError {
    let (message, suggestion, severity) = match cause {
        Selection::Device => (
            "Nothing to run yet.",
            "Choose an output device first.",
            Severity::ActionRequired,
        ),
        Selection::OutputFile => (
            "No output file was given.",
            "This device writes a file. Name one with --output.",
            Severity::ActionRequired,
        ),
        Selection::Input => (
            "No document was given.",
            "Pick the document Ghostscript should process.",
            Severity::ActionRequired,
        ),
        Selection::DebugSwitch => (
            "That debug switch is not known.",
            "Use one of the engine's switch names, such as PDFDEBUG or TTFDEBUG.",
            Severity::ActionRequired,
        ),
        Selection::ModelKind => (
            "These options cannot be used together.",
            "Keep debug switches apart from PDF options, and make --kind fit every option.",
            Severity::Conformance,
        ),
        Selection::DisplayOutput => (
            "On-screen preview is not available here.",
            "Choose a file-writing device such as pdfwrite or png16m.",
            Severity::ActionRequired,
        ),
        Selection::DisplayFormat => (
            "The preview page could not be shown.",
            "Try a 24- or 32-bit display format.",
            Severity::Failure,
        ),
    };
    HumanError {
        message: message.into(),
        suggestion: format!("{suggestion} ({detail})"),
        severity,
    }
}
