// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine-wide switches shared by every parameter model.
//
// Token order is fixed: the engine applies definitions left to right, and the
// output of two runs with equal models must be byte-identical.

use std::path::PathBuf;

use gsargs_core::error::{GsError, Result};
use gsargs_core::types::{HostDisplay, is_display_device};
use tracing::{debug, instrument};

use crate::display_format::DisplayFormat;
use crate::emit::{emit_bool, emit_int, emit_str};
use crate::model::EngineParams;
use crate::path::{canonicalize, path_key};

/// Definitions every engine invocation starts from.
///
/// They express the model's `quiet = true` and `batch = true` defaults, so a
/// model only emits `-dQUIET=false` or `-dBATCH=false` to override them.
pub const BASELINE_ARGS: &[&str] = &["-dQUIET", "-dBATCH"];

/// Separator used when joining source paths into one `-I` token.
pub const SOURCE_PATH_SEPARATOR: &str = ";";

/// Ordered set of canonical include directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePaths {
    entries: Vec<String>,
}

impl SourcePaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory. Returns `false` if it was already present.
    pub fn add(&mut self, path: &str) -> Result<bool> {
        let canonical = canonicalize(path);
        if canonical.is_empty() || !PathBuf::from(&canonical).is_dir() {
            return Err(GsError::DirectoryNotFound(PathBuf::from(path)));
        }
        if self.contains(&canonical) {
            debug!(path = %canonical, "source path already registered");
            return Ok(false);
        }
        debug!(path = %canonical, "source path registered");
        self.entries.push(canonical);
        Ok(true)
    }

    pub fn contains(&self, path: &str) -> bool {
        let key = path_key(&canonicalize(path));
        self.entries.iter().any(|e| path_key(e) == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn joined(&self) -> String {
        self.entries.join(SOURCE_PATH_SEPARATOR)
    }
}

/// Display format and resolution as they will be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveDisplay {
    pub format: DisplayFormat,
    pub resolution: i32,
}

/// Work out the display format and resolution to emit.
///
/// When previewing on the display device with no format chosen, the host's
/// color depth picks one, and an unset resolution takes the host DPI. The
/// model itself is left untouched.
pub fn resolve_effective_display(params: &BaseParams, host: &HostDisplay) -> EffectiveDisplay {
    let mut effective = EffectiveDisplay {
        format: params.display_format,
        resolution: params.display_resolution,
    };
    if is_display_device(&params.device) && params.display_format.is_unset() {
        effective.format = DisplayFormat::from_color_depth(host.color_depth);
        if effective.resolution == 0 {
            effective.resolution = i32::try_from(host.dpi).unwrap_or(i32::MAX);
        }
    }
    effective
}

/// Engine-wide switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseParams {
    quiet: bool,
    batch: bool,
    no_page_prompt: bool,
    no_pause: bool,
    no_prompt: bool,
    no_safer: bool,
    short_errors: bool,
    device: String,
    display_format: DisplayFormat,
    display_resolution: i32,
    output_file: String,
    font_resource_dir: String,
    generic_resource_dir: String,
    source_paths: SourcePaths,
}

impl Default for BaseParams {
    fn default() -> Self {
        Self {
            quiet: true,
            batch: true,
            no_page_prompt: false,
            no_pause: false,
            no_prompt: false,
            no_safer: false,
            short_errors: false,
            device: String::new(),
            display_format: DisplayFormat::default(),
            display_resolution: 0,
            output_file: String::new(),
            font_resource_dir: String::new(),
            generic_resource_dir: String::new(),
            source_paths: SourcePaths::default(),
        }
    }
}

impl BaseParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    pub fn batch(&self) -> bool {
        self.batch
    }

    pub fn set_batch(&mut self, batch: bool) {
        self.batch = batch;
    }

    pub fn no_page_prompt(&self) -> bool {
        self.no_page_prompt
    }

    pub fn set_no_page_prompt(&mut self, no_page_prompt: bool) {
        self.no_page_prompt = no_page_prompt;
    }

    pub fn no_pause(&self) -> bool {
        self.no_pause
    }

    pub fn set_no_pause(&mut self, no_pause: bool) {
        self.no_pause = no_pause;
    }

    pub fn no_prompt(&self) -> bool {
        self.no_prompt
    }

    pub fn set_no_prompt(&mut self, no_prompt: bool) {
        self.no_prompt = no_prompt;
    }

    /// Whether file-system restrictions are lifted (`-dNOSAFER`).
    pub fn no_safer(&self) -> bool {
        self.no_safer
    }

    pub fn set_no_safer(&mut self, no_safer: bool) {
        self.no_safer = no_safer;
    }

    pub fn short_errors(&self) -> bool {
        self.short_errors
    }

    pub fn set_short_errors(&mut self, short_errors: bool) {
        self.short_errors = short_errors;
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn set_device(&mut self, device: impl Into<String>) {
        self.device = device.into();
    }

    pub fn display_format(&self) -> DisplayFormat {
        self.display_format
    }

    pub fn set_display_format(&mut self, format: DisplayFormat) {
        self.display_format = format;
    }

    /// Preview resolution in DPI; `0` means unset.
    pub fn display_resolution(&self) -> i32 {
        self.display_resolution
    }

    pub fn set_display_resolution(&mut self, dpi: i32) {
        self.display_resolution = dpi;
    }

    pub fn output_file(&self) -> &str {
        &self.output_file
    }

    pub fn set_output_file(&mut self, path: impl Into<String>) {
        self.output_file = path.into();
    }

    pub fn font_resource_dir(&self) -> &str {
        &self.font_resource_dir
    }

    pub fn set_font_resource_dir(&mut self, dir: impl Into<String>) {
        self.font_resource_dir = dir.into();
    }

    pub fn generic_resource_dir(&self) -> &str {
        &self.generic_resource_dir
    }

    pub fn set_generic_resource_dir(&mut self, dir: impl Into<String>) {
        self.generic_resource_dir = dir.into();
    }

    pub fn source_paths(&self) -> &SourcePaths {
        &self.source_paths
    }

    /// Register an include directory for the engine's `-I` search path.
    pub fn add_source_path(&mut self, path: &str) -> Result<bool> {
        self.source_paths.add(path)
    }

    /// Emit the base tier using `sources` as the include set.
    ///
    /// Higher tiers pass an extended copy of [`Self::source_paths`] when they
    /// contribute directories of their own.
    #[instrument(level = "debug", skip_all, fields(device = %self.device))]
    pub(crate) fn write_base_args(
        &self,
        host: &HostDisplay,
        sources: &SourcePaths,
        out: &mut Vec<String>,
    ) {
        let defaults = Self::default();

        emit_bool(out, self.quiet, defaults.quiet, "-dQUIET=");
        emit_bool(out, self.batch, defaults.batch, "-dBATCH=");
        emit_bool(out, self.no_page_prompt, defaults.no_page_prompt, "-dNOPAGEPROMPT");
        emit_bool(out, self.no_pause, defaults.no_pause, "-dNOPAUSE");
        emit_bool(out, self.no_prompt, defaults.no_prompt, "-dNOPROMPT");
        emit_bool(out, self.no_safer, defaults.no_safer, "-dNOSAFER");
        emit_bool(out, self.short_errors, defaults.short_errors, "-dSHORTERRORS");
        emit_str(out, &self.device, &defaults.device, "-sDEVICE=");

        let effective = resolve_effective_display(self, host);
        if effective.format != self.display_format {
            debug!(
                format = %effective.format,
                dpi = effective.resolution,
                "display format taken from host"
            );
        }
        emit_int(out, effective.format.bits(), defaults.display_format.bits(), "-dDisplayFormat=");
        emit_int(out, effective.resolution, defaults.display_resolution, "-dDisplayResolution=");

        if !sources.is_empty() {
            out.push(format!("-I{}", sources.joined()));
        }
        emit_str(
            out,
            &self.font_resource_dir,
            &defaults.font_resource_dir,
            "-sFontResourceDir=",
        );
        emit_str(
            out,
            &self.generic_resource_dir,
            &defaults.generic_resource_dir,
            "-sGenericResourceDir=",
        );
        emit_str(out, &self.output_file, &defaults.output_file, "-sOutputFile=");
    }
}

impl EngineParams for BaseParams {
    fn base(&self) -> &BaseParams {
        self
    }

    fn base_mut(&mut self) -> &mut BaseParams {
        self
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn write_args(&self, host: &HostDisplay, out: &mut Vec<String>) -> Result<()> {
        self.write_base_args(host, &self.source_paths, out);
        Ok(())
    }
}
