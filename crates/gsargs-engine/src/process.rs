// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run the engine as a child process.
//
// The command line is `exe <baseline> <tokens> [-sOutputFile=..] -f <input>`.
// Stdout and stderr are forwarded line by line while the child runs. The
// child is killed if the run future is dropped.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use chrono::Utc;
use gsargs_core::error::{GsError, Result, Selection};
use gsargs_params::BASELINE_ARGS;
use gsargs_params::path::canonicalize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::traits::{Engine, EngineEvent, OutputTarget, RunOutcome, RunRequest};

/// Executable name looked up when no library directory is configured.
#[cfg(windows)]
pub const DEFAULT_EXECUTABLE: &str = "gswin64c.exe";
#[cfg(not(windows))]
pub const DEFAULT_EXECUTABLE: &str = "gs";

const OUTPUT_FILE_TOKEN: &str = "-sOutputFile=";

/// Engine backed by the console executable.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    executable: PathBuf,
}

impl ProcessEngine {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The executable inside `library_dir`, or on `PATH` when it is empty.
    pub fn locate(library_dir: &str) -> Self {
        if library_dir.is_empty() {
            Self::new(DEFAULT_EXECUTABLE)
        } else {
            Self::new(Path::new(library_dir).join(DEFAULT_EXECUTABLE))
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments passed after the executable name.
    ///
    /// An explicit `-sOutputFile=` token in the request wins over the
    /// request's output target.
    pub fn command_line(&self, request: &RunRequest) -> Result<Vec<String>> {
        if request.input.as_os_str().is_empty() {
            return Err(GsError::UnsupportedSelection(
                Selection::Input,
                "no input document".into(),
            ));
        }
        let mut argv: Vec<String> = BASELINE_ARGS.iter().map(|s| s.to_string()).collect();
        argv.extend(request.args.iter().cloned());

        match &request.output {
            OutputTarget::Display => {
                return Err(GsError::UnsupportedSelection(
                    Selection::DisplayOutput,
                    "display output needs an in-process engine".into(),
                ));
            }
            OutputTarget::File(path) => {
                if !request.args.iter().any(|t| t.starts_with(OUTPUT_FILE_TOKEN)) {
                    argv.push(format!(
                        "{OUTPUT_FILE_TOKEN}{}",
                        canonicalize(&path.to_string_lossy())
                    ));
                }
            }
        }

        argv.push("-f".into());
        argv.push(canonicalize(&request.input.to_string_lossy()));
        Ok(argv)
    }
}

impl Engine for ProcessEngine {
    #[instrument(skip_all, fields(run = %request.id, exe = %self.executable.display()))]
    async fn run(
        &self,
        request: RunRequest,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<RunOutcome> {
        let argv = self.command_line(&request)?;
        debug!(?argv, "spawning engine");

        let started_at = Utc::now();
        let mut child = Command::new(&self.executable)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                GsError::Engine(format!(
                    "failed to start {}: {err}",
                    self.executable.display()
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GsError::Engine("engine stdout not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| GsError::Engine("engine stderr not captured".into()))?;

        let (out_lines, err_lines, status) = tokio::join!(
            forward_lines(stdout, events.clone(), EngineEvent::Stdout),
            forward_lines(stderr, events, EngineEvent::Stderr),
            child.wait(),
        );
        out_lines?;
        err_lines?;
        let status = status_code(status?);

        let outcome = RunOutcome {
            id: request.id,
            status,
            started_at,
            finished_at: Utc::now(),
        };
        if outcome.succeeded() {
            info!(status, "engine finished");
        } else {
            warn!(status, "engine failed");
        }
        Ok(outcome)
    }
}

async fn forward_lines<R>(
    reader: R,
    events: mpsc::Sender<EngineEvent>,
    wrap: fn(String) -> EngineEvent,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut listening = true;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        // File names are echoed in the console code page, not UTF-8.
        let line = decode_line(&buf);
        // Keep draining after the receiver goes away so the child never
        // blocks on a full pipe.
        if listening && events.send(wrap(line)).await.is_err() {
            debug!("event receiver closed");
            listening = false;
        }
    }
}

/// One output line without its terminator, invalid bytes replaced.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Map a process exit status onto the engine's sign convention.
fn status_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) if code > 0 => -code,
        Some(code) => code,
        None => -1,
    }
}
