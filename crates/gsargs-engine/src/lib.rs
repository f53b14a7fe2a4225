// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gsargs-engine — Executes finished token lists.
//
// The parameter models never cross into this crate; only the immutable token
// list does, so a run may be moved onto another task or thread freely.

pub mod display;
pub mod process;
pub mod scripted;
pub mod traits;

pub use display::{DisplayPages, RawPage};
pub use process::ProcessEngine;
pub use scripted::ScriptedEngine;
pub use traits::{Engine, EngineEvent, OutputTarget, RunId, RunOutcome, RunRequest};
