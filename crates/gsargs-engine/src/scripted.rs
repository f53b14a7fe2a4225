// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine that replays canned output instead of executing anything.
//
// Used to exercise callers without an engine installed.
// Every request it receives is recorded for inspection.

use std::sync::Mutex;

use chrono::Utc;
use gsargs_core::error::{GsError, Result};
use tokio::sync::mpsc;
use tracing::debug;

use crate::traits::{Engine, EngineEvent, RunOutcome, RunRequest};

/// Replays a fixed list of events and finishes with a fixed status.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    script: Vec<EngineEvent>,
    status: i32,
    requests: Mutex<Vec<RunRequest>>,
}

impl ScriptedEngine {
    pub fn new(script: Vec<EngineEvent>, status: i32) -> Self {
        Self {
            script,
            status,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RunRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Engine for ScriptedEngine {
    async fn run(
        &self,
        request: RunRequest,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<RunOutcome> {
        let started_at = Utc::now();
        let id = request.id;
        self.requests
            .lock()
            .map_err(|_| GsError::Engine("scripted engine state poisoned".into()))?
            .push(request);

        for event in &self.script {
            if events.send(event.clone()).await.is_err() {
                debug!("event receiver closed");
                break;
            }
        }

        Ok(RunOutcome {
            id,
            status: self.status,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
