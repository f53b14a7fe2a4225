// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gsargs_core::types::{ColorConversionStrategy, CompatibilityPolicy, HostDisplay};

#[derive(Debug, Parser)]
#[command(
    name = "gsargs",
    about = "Build Ghostscript argument lists from typed options and run the engine",
    author,
    version
)]
pub struct Cli {
    /// Settings file (defaults to the platform data directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the generated tokens, one per line.
    Args(ArgsCommand),
    /// Run the engine on an input document.
    Run(RunCommand),
    /// Inspect or change persisted settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Args)]
pub struct ArgsCommand {
    #[command(flatten)]
    pub model: ModelOptions,
    /// Also print the switches every run starts with.
    #[arg(long)]
    pub baseline: bool,
    /// Print a JSON array instead of one token per line.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Document handed to the engine.
    pub input: PathBuf,
    #[command(flatten)]
    pub model: ModelOptions,
    /// Engine executable (defaults to the one in the configured library directory).
    #[arg(long, value_name = "EXE")]
    pub gs: Option<PathBuf>,
    /// Print the command line instead of running it.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print all settings as JSON.
    Show,
    /// Print the location of the settings file.
    Path,
    /// Change one setting.
    Set {
        key: SettingKey,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    LastFilePath,
    LibraryDir,
    IccDir,
    UserArgs,
    DeviceIndex,
}

/// Which parameter model the options are applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ModelKind {
    Base,
    Debug,
    Pdf,
    Pdfax,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyChoice {
    Unchanged,
    Rgb,
    Cmyk,
    Gray,
    #[value(name = "device-independent", alias = "cie")]
    DeviceIndependent,
}

impl From<StrategyChoice> for ColorConversionStrategy {
    fn from(choice: StrategyChoice) -> Self {
        match choice {
            StrategyChoice::Unchanged => ColorConversionStrategy::Unchanged,
            StrategyChoice::Rgb => ColorConversionStrategy::Rgb,
            StrategyChoice::Cmyk => ColorConversionStrategy::Cmyk,
            StrategyChoice::Gray => ColorConversionStrategy::Gray,
            StrategyChoice::DeviceIndependent => ColorConversionStrategy::DeviceIndependent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyChoice {
    Continue,
    Ignore,
    Stop,
}

impl From<PolicyChoice> for CompatibilityPolicy {
    fn from(choice: PolicyChoice) -> Self {
        match choice {
            PolicyChoice::Continue => CompatibilityPolicy::Continue,
            PolicyChoice::Ignore => CompatibilityPolicy::Ignore,
            PolicyChoice::Stop => CompatibilityPolicy::Stop,
        }
    }
}

/// Options shared by `args` and `run`, grouped by model tier.
#[derive(Debug, Default, Args)]
pub struct ModelOptions {
    /// Model to build; inferred from the options given when omitted.
    #[arg(long, value_enum)]
    pub kind: Option<ModelKind>,
    #[command(flatten)]
    pub base: BaseOptions,
    #[command(flatten)]
    pub pdf: PdfOptions,
    #[command(flatten)]
    pub pdfax: PdfAxOptions,
    /// Diagnostic switch to enable, e.g. PDFDEBUG (repeatable).
    #[arg(long = "debug", value_name = "SWITCH")]
    pub debug: Vec<String>,
    /// Extra arguments appended verbatim (defaults to the saved user_args).
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub extra: Option<String>,
    /// Color depth of the host screen, used for display previews.
    #[arg(long, default_value_t = HostDisplay::default().color_depth)]
    pub host_depth: u32,
    /// Pixel density of the host screen, used for display previews.
    #[arg(long, default_value_t = HostDisplay::default().dpi)]
    pub host_dpi: u32,
}

impl ModelOptions {
    pub fn host(&self) -> HostDisplay {
        HostDisplay {
            color_depth: self.host_depth,
            dpi: self.host_dpi,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct BaseOptions {
    /// Output device name.
    #[arg(long, short = 'd', conflicts_with = "device_index")]
    pub device: Option<String>,
    /// Output device by position in the device catalog.
    #[arg(long)]
    pub device_index: Option<i64>,
    /// Output file.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<String>,
    /// Let the engine print its banner and progress.
    #[arg(long)]
    pub verbose: bool,
    /// Leave the engine at its prompt after processing.
    #[arg(long)]
    pub interactive: bool,
    #[arg(long)]
    pub no_page_prompt: bool,
    #[arg(long)]
    pub no_pause: bool,
    #[arg(long)]
    pub no_prompt: bool,
    /// Lift the engine's file access restrictions.
    #[arg(long)]
    pub no_safer: bool,
    #[arg(long)]
    pub short_errors: bool,
    /// Packed display format (derived from --host-depth when omitted).
    #[arg(long, value_name = "BITS")]
    pub display_format: Option<u32>,
    /// Display resolution in dpi (defaults to --host-dpi).
    #[arg(long, value_name = "DPI")]
    pub display_resolution: Option<i32>,
    /// Directory searched for resources and included files (repeatable).
    #[arg(long = "include", short = 'I', value_name = "DIR")]
    pub include: Vec<String>,
    #[arg(long, value_name = "DIR")]
    pub font_resource_dir: Option<String>,
    #[arg(long, value_name = "DIR")]
    pub generic_resource_dir: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct PdfOptions {
    #[arg(long, value_enum)]
    pub color_strategy: Option<StrategyChoice>,
    #[arg(long)]
    pub embed_all_fonts: bool,
    /// Use the newer PDF interpreter.
    #[arg(long)]
    pub new_pdf: bool,
    /// Dump document information instead of rendering.
    #[arg(long)]
    pub pdf_info: bool,
    #[arg(long)]
    pub fit_page: bool,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub use_bleed_box: bool,
    #[arg(long)]
    pub use_trim_box: bool,
    #[arg(long)]
    pub use_art_box: bool,
    #[arg(long)]
    pub use_crop_box: bool,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub hide_annots: bool,
    #[arg(long)]
    pub hide_acro_form: bool,
    #[arg(long)]
    pub no_user_unit: bool,
    #[arg(long)]
    pub render_tt_notdef: bool,
    #[arg(long, value_name = "PAGE")]
    pub first_page: Option<i32>,
    #[arg(long, value_name = "PAGE")]
    pub last_page: Option<i32>,
    /// Pages to process, e.g. "1,3,5-7".
    #[arg(long, value_name = "LIST")]
    pub page_list: Option<String>,
    #[arg(long)]
    pub no_subset_fonts: bool,
}

impl PdfOptions {
    pub fn any(&self) -> bool {
        self.color_strategy.is_some()
            || self.embed_all_fonts
            || self.new_pdf
            || self.pdf_info
            || self.fit_page
            || self.title.is_some()
            || self.use_bleed_box
            || self.use_trim_box
            || self.use_art_box
            || self.use_crop_box
            || self.password.is_some()
            || self.hide_annots
            || self.hide_acro_form
            || self.no_user_unit
            || self.render_tt_notdef
            || self.first_page.is_some()
            || self.last_page.is_some()
            || self.page_list.is_some()
            || self.no_subset_fonts
    }
}

#[derive(Debug, Default, Args)]
pub struct PdfAxOptions {
    /// Produce PDF/A at the given conformance level.
    #[arg(long, value_name = "LEVEL", conflicts_with = "pdfx")]
    pub pdfa: Option<i32>,
    /// Produce PDF/X.
    #[arg(long)]
    pub pdfx: bool,
    /// Output intent ICC profile.
    #[arg(long, value_name = "PATH")]
    pub icc_profile: Option<PathBuf>,
    /// What to do when a PDF/A run meets a non-conformant construct.
    #[arg(long, value_enum)]
    pub compat_policy: Option<PolicyChoice>,
    #[arg(long, value_name = "ID")]
    pub output_condition: Option<String>,
}

impl PdfAxOptions {
    pub fn any(&self) -> bool {
        self.pdfa.is_some()
            || self.pdfx
            || self.icc_profile.is_some()
            || self.compat_policy.is_some()
            || self.output_condition.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_a_pdfa_run() {
        let cli = Cli::try_parse_from([
            "gsargs",
            "run",
            "in.ps",
            "-d",
            "pdfwrite",
            "-o",
            "out.pdf",
            "--pdfa",
            "2",
            "--color-strategy",
            "rgb",
        ])
        .unwrap();
        let Command::Run(run) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(run.input, PathBuf::from("in.ps"));
        assert_eq!(run.model.base.device.as_deref(), Some("pdfwrite"));
        assert_eq!(run.model.pdfax.pdfa, Some(2));
        assert!(run.model.pdf.any());
        assert!(run.model.pdfax.any());
        assert_eq!(run.model.host(), HostDisplay::default());
    }

    #[test]
    fn pdfa_and_pdfx_conflict() {
        assert!(Cli::try_parse_from(["gsargs", "args", "--pdfa", "1", "--pdfx"]).is_err());
    }

    #[test]
    fn extra_accepts_leading_hyphens() {
        let cli = Cli::try_parse_from(["gsargs", "args", "--extra", "-dFoo -dBar"]).unwrap();
        let Command::Args(args) = cli.command else {
            panic!("expected args");
        };
        assert_eq!(args.model.extra.as_deref(), Some("-dFoo -dBar"));
    }

    #[test]
    fn settings_keys_are_kebab_case() {
        let cli = Cli::try_parse_from(["gsargs", "settings", "set", "device-index", "1"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Settings(SettingsCommand::Set {
                key: SettingKey::DeviceIndex,
                ..
            })
        ));
    }
}
