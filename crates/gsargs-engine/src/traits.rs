// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The contract between a finished token list and whatever executes it.
//
// An engine receives the tokens plus input and output locations, streams its
// text output and any preview pages as events, and finishes with a status
// code where negative means failure.

use std::future::Future;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use gsargs_core::error::Result;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::display::RawPage;

/// Unique identifier for one engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where rendered output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Written to this file (may contain the engine's `%d` page placeholder).
    File(PathBuf),
    /// Rendered pages are delivered back as [`EngineEvent::Page`].
    Display,
}

/// Everything an engine needs for one run. The token list is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub id: RunId,
    pub args: Vec<String>,
    pub input: PathBuf,
    pub output: OutputTarget,
}

impl RunRequest {
    pub fn new(args: Vec<String>, input: impl Into<PathBuf>, output: OutputTarget) -> Self {
        Self {
            id: RunId::new(),
            args,
            input: input.into(),
            output,
        }
    }
}

/// Something the engine produced while running.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Stdout(String),
    Stderr(String),
    /// A finished page in the run's display format; receivers convert it
    /// with [`crate::DisplayPages`].
    Page(RawPage),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub id: RunId,
    /// Zero or positive on success, negative on failure.
    pub status: i32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunOutcome {
    pub fn succeeded(&self) -> bool {
        self.status >= 0
    }
}

/// Executes finished token lists.
pub trait Engine {
    /// Run `request`, sending output to `events` as it appears.
    ///
    /// A closed `events` receiver does not stop the run.
    fn run(
        &self,
        request: RunRequest,
        events: mpsc::Sender<EngineEvent>,
    ) -> impl Future<Output = Result<RunOutcome>> + Send;
}
