// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gsargs — Ghostscript argument compiler
//
// Entry point. Initialises logging, loads settings, and dispatches the
// subcommand. Stdout carries tokens and engine output; logs go to stderr.

mod cli;
mod data_dir;
mod model;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use gsargs_core::config::{AppSettings, JsonSettingsStore, SettingsStore};
use gsargs_core::error::{GsError, Result, Selection};
use gsargs_core::human_errors::humanize_error;
use gsargs_core::types::{DEVICES, device_for_index, is_display_device};
use gsargs_engine::{
    DisplayPages, Engine, EngineEvent, OutputTarget, ProcessEngine, RunOutcome, RunRequest,
};
use gsargs_params::BASELINE_ARGS;
use gsargs_params::path::canonicalize;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use cli::{ArgsCommand, Cli, Command, RunCommand, SettingKey, SettingsCommand};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(%err, "gsargs failed");
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::from(2)
        }
    }
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    let settings_path = cli.settings.unwrap_or_else(data_dir::settings_path);
    let mut store = JsonSettingsStore::open(&settings_path)?;
    let settings = AppSettings::load(&store);

    match cli.command {
        Command::Args(cmd) => print_args(&cmd, &settings).map(|_| ExitCode::SUCCESS),
        Command::Run(cmd) => run(cmd, settings, &mut store).await,
        Command::Settings(cmd) => {
            settings_command(cmd, settings, &mut store).map(|_| ExitCode::SUCCESS)
        }
    }
}

fn print_args(cmd: &ArgsCommand, settings: &AppSettings) -> Result<()> {
    let built = model::build_model(&cmd.model, settings)?;
    let mut args: Vec<String> = Vec::new();
    if cmd.baseline {
        args.extend(BASELINE_ARGS.iter().map(|s| s.to_string()));
    }
    args.extend(model::tokens(&built, &cmd.model, settings)?);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&args)?);
    } else {
        for arg in &args {
            println!("{arg}");
        }
    }
    Ok(())
}

async fn run(
    cmd: RunCommand,
    mut settings: AppSettings,
    store: &mut JsonSettingsStore,
) -> Result<ExitCode> {
    let built = model::build_model(&cmd.model, &settings)?;
    let base = built.params().base();
    if base.device().is_empty() {
        return Err(GsError::UnsupportedSelection(
            Selection::Device,
            "no output device selected; pass --device or --device-index".into(),
        ));
    }
    let output = output_target(base.device(), base.output_file())?;
    let args = model::tokens(&built, &cmd.model, &settings)?;
    let request = RunRequest::new(args, &cmd.input, output);

    let engine = match &cmd.gs {
        Some(exe) => ProcessEngine::new(exe),
        None => ProcessEngine::locate(&settings.library_dir),
    };

    if cmd.dry_run {
        let argv = engine.command_line(&request)?;
        println!("{} {}", engine.executable().display(), argv.join(" "));
        return Ok(ExitCode::SUCCESS);
    }

    remember_run(&mut settings, &cmd, base.device());
    settings.store(store);
    store.save()?;

    let (outcome, _pages) = execute(&engine, request).await?;
    Ok(ExitCode::from(exit_status(&outcome)))
}

/// Where a run with this device and output file writes its result.
fn output_target(device: &str, output_file: &str) -> Result<OutputTarget> {
    if !output_file.is_empty() {
        Ok(OutputTarget::File(PathBuf::from(output_file)))
    } else if is_display_device(device) {
        Ok(OutputTarget::Display)
    } else {
        Err(GsError::UnsupportedSelection(
            Selection::OutputFile,
            format!("the {device} device needs an output file; pass --output"),
        ))
    }
}

/// Record the choices of a run so the next one starts from them.
fn remember_run(settings: &mut AppSettings, cmd: &RunCommand, device: &str) {
    settings.last_file_path = canonicalize(&cmd.input.to_string_lossy());
    if let Some(index) = DEVICES.iter().position(|d| d.eq_ignore_ascii_case(device)) {
        settings.device_index = index as i64;
    }
    if let Some(dir) = cmd.model.pdfax.icc_profile.as_deref().and_then(Path::parent) {
        if !dir.as_os_str().is_empty() {
            settings.icc_dir = canonicalize(&dir.to_string_lossy());
        }
    }
}

/// Run `request` on `engine`, echoing engine output as it arrives and
/// collecting display pages.
#[instrument(skip_all, fields(run = %request.id))]
async fn execute<E: Engine>(
    engine: &E,
    request: RunRequest,
) -> Result<(RunOutcome, DisplayPages)> {
    let (tx, mut rx) = mpsc::channel(64);
    let printer = async move {
        let mut pages = DisplayPages::new();
        while let Some(event) = rx.recv().await {
            match event {
                EngineEvent::Stdout(line) => println!("{line}"),
                EngineEvent::Stderr(line) => eprintln!("{line}"),
                EngineEvent::Page(raw) => match pages.push(&raw) {
                    Ok(index) => {
                        info!(index, width = raw.width, height = raw.height, "page rendered")
                    }
                    Err(err) => warn!(%err, "display page dropped"),
                },
            }
        }
        pages
    };
    let (outcome, pages) = tokio::join!(engine.run(request, tx), printer);
    let outcome = outcome?;
    info!(status = outcome.status, pages = pages.len(), "run complete");
    Ok((outcome, pages))
}

/// Engine status codes are zero or negative; the process exit code is their
/// magnitude, capped to what a shell can represent.
fn exit_status(outcome: &RunOutcome) -> u8 {
    if outcome.succeeded() {
        0
    } else {
        outcome.status.unsigned_abs().clamp(1, 255) as u8
    }
}

fn settings_command(
    cmd: SettingsCommand,
    mut settings: AppSettings,
    store: &mut JsonSettingsStore,
) -> Result<()> {
    match cmd {
        SettingsCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsCommand::Path => {
            println!("{}", store.path().display());
        }
        SettingsCommand::Set { key, value } => {
            apply_setting(&mut settings, key, &value)?;
            settings.store(store);
            store.save()?;
            info!(?key, "setting changed");
        }
    }
    Ok(())
}

fn apply_setting(settings: &mut AppSettings, key: SettingKey, value: &str) -> Result<()> {
    match key {
        SettingKey::LastFilePath => settings.last_file_path = value.to_string(),
        SettingKey::LibraryDir => settings.library_dir = canonicalize(value),
        SettingKey::IccDir => settings.icc_dir = canonicalize(value),
        SettingKey::UserArgs => settings.user_args = value.to_string(),
        SettingKey::DeviceIndex => {
            let index: i64 = value.trim().parse().map_err(|_| {
                GsError::Settings(format!("device_index must be an integer, got {value:?}"))
            })?;
            if index >= 0 {
                device_for_index(index)?;
            }
            settings.device_index = index.max(-1);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsargs_engine::{RawPage, ScriptedEngine};
    use gsargs_params::DisplayFormat;

    #[test]
    fn output_target_rules() {
        assert_eq!(
            output_target("pdfwrite", "/tmp/out.pdf").unwrap(),
            OutputTarget::File(PathBuf::from("/tmp/out.pdf"))
        );
        assert_eq!(output_target("display", "").unwrap(), OutputTarget::Display);
        assert!(matches!(
            output_target("pdfwrite", ""),
            Err(GsError::UnsupportedSelection(Selection::OutputFile, _))
        ));
    }

    #[test]
    fn setting_values_are_validated() {
        let mut settings = AppSettings::default();
        apply_setting(&mut settings, SettingKey::DeviceIndex, "1").unwrap();
        assert_eq!(settings.device_index, 1);
        assert!(apply_setting(&mut settings, SettingKey::DeviceIndex, "many").is_err());
        assert!(apply_setting(&mut settings, SettingKey::DeviceIndex, "999").is_err());
        assert_eq!(settings.device_index, 1);

        apply_setting(&mut settings, SettingKey::DeviceIndex, "-5").unwrap();
        assert_eq!(settings.device_index, -1);

        apply_setting(&mut settings, SettingKey::LibraryDir, r"C:\gs\bin\").unwrap();
        assert_eq!(settings.library_dir, "C:/gs/bin");
    }

    #[test]
    fn settings_set_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut store = JsonSettingsStore::open(&path).unwrap();
        settings_command(
            SettingsCommand::Set {
                key: SettingKey::UserArgs,
                value: "-dNOSAFER".into(),
            },
            AppSettings::default(),
            &mut store,
        )
        .unwrap();

        let reopened = JsonSettingsStore::open(&path).unwrap();
        assert_eq!(AppSettings::load(&reopened).user_args, "-dNOSAFER");
    }

    #[test]
    fn run_choices_are_remembered() {
        let cmd = match Cli::try_parse_from([
            "gsargs",
            "run",
            r"C:\docs\in.ps",
            "-d",
            "PS2WRITE",
            "-o",
            "out.ps",
        ])
        .unwrap()
        .command
        {
            Command::Run(cmd) => cmd,
            other => panic!("unexpected command {other:?}"),
        };
        let mut settings = AppSettings::default();
        remember_run(&mut settings, &cmd, "PS2WRITE");
        assert_eq!(settings.last_file_path, "C:/docs/in.ps");
        assert_eq!(settings.device_index, 2);
        assert_eq!(settings.icc_dir, "");
    }

    #[test]
    fn failing_status_maps_to_exit_code() {
        let outcome = |status| RunOutcome {
            id: Default::default(),
            status,
            started_at: Default::default(),
            finished_at: Default::default(),
        };
        assert_eq!(exit_status(&outcome(0)), 0);
        assert_eq!(exit_status(&outcome(-1)), 1);
        assert_eq!(exit_status(&outcome(-100)), 100);
        assert_eq!(exit_status(&outcome(-1000)), 255);
    }

    #[tokio::test]
    async fn execute_drains_engine_events() {
        let engine = ScriptedEngine::new(
            vec![
                EngineEvent::Stdout("GPL Ghostscript".into()),
                EngineEvent::Stderr("**** Error".into()),
            ],
            -1,
        );
        let request = RunRequest::new(
            vec!["-sDEVICE=pdfwrite".into()],
            "/in.ps",
            OutputTarget::File("/out.pdf".into()),
        );
        let (outcome, pages) = execute(&engine, request.clone()).await.unwrap();
        assert_eq!(outcome.status, -1);
        assert_eq!(outcome.id, request.id);
        assert_eq!(engine.requests(), [request]);
        assert!(pages.is_empty());
    }

    #[tokio::test]
    async fn execute_collects_display_pages() {
        let page = |data: Vec<u8>| {
            EngineEvent::Page(RawPage {
                format: DisplayFormat::from_color_depth(8),
                width: 2,
                height: 1,
                raster: 2,
                data,
            })
        };
        // The middle page is one byte short and is dropped.
        let script = vec![page(vec![0x30, 0x5f]), page(vec![0]), page(vec![0, 0])];
        let engine = ScriptedEngine::new(script, 0);
        let request = RunRequest::new(
            vec!["-sDEVICE=display".into()],
            "/in.ps",
            OutputTarget::Display,
        );
        let (outcome, pages) = execute(&engine, request).await.unwrap();
        assert!(outcome.succeeded());
        assert_eq!(pages.len(), 2);
        let first = pages.page(0).unwrap();
        assert_eq!(first.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(first.get_pixel(1, 0).0, [255, 255, 255, 255]);
        assert_eq!(pages.page(1).unwrap().get_pixel(0, 0).0, [0, 0, 0, 255]);
    }
}
