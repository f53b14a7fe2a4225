// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Turn parsed command-line options plus saved settings into a parameter model.

use std::path::{Path, PathBuf};

use gsargs_core::config::AppSettings;
use gsargs_core::error::{GsError, Result, Selection};
use gsargs_core::types::device_for_index;
use gsargs_params::{
    BaseParams, DebugFlags, DebugParams, DisplayFormat, EngineParams, PdfAxParams, PdfParams,
    split_user_args,
};
use tracing::{debug, instrument, warn};

use crate::cli::{BaseOptions, ModelKind, ModelOptions, PdfAxOptions, PdfOptions};

/// One built parameter model of any tier.
#[derive(Debug, Clone)]
pub enum Model {
    Base(BaseParams),
    Debug(DebugParams),
    Pdf(PdfParams),
    PdfAx(PdfAxParams),
}

impl Model {
    fn empty(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Base => Model::Base(BaseParams::new()),
            ModelKind::Debug => Model::Debug(DebugParams::new()),
            ModelKind::Pdf => Model::Pdf(PdfParams::new()),
            ModelKind::Pdfax => Model::PdfAx(PdfAxParams::new()),
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Base(_) => ModelKind::Base,
            Model::Debug(_) => ModelKind::Debug,
            Model::Pdf(_) => ModelKind::Pdf,
            Model::PdfAx(_) => ModelKind::Pdfax,
        }
    }

    pub fn params(&self) -> &dyn EngineParams {
        match self {
            Model::Base(p) => p,
            Model::Debug(p) => p,
            Model::Pdf(p) => p,
            Model::PdfAx(p) => p,
        }
    }

    pub fn params_mut(&mut self) -> &mut dyn EngineParams {
        match self {
            Model::Base(p) => p,
            Model::Debug(p) => p,
            Model::Pdf(p) => p,
            Model::PdfAx(p) => p,
        }
    }
}

fn kind_name(kind: ModelKind) -> &'static str {
    match kind {
        ModelKind::Base => "base",
        ModelKind::Debug => "debug",
        ModelKind::Pdf => "pdf",
        ModelKind::Pdfax => "pdfax",
    }
}

/// Pick the model tier. An explicit `--kind` must be able to carry every
/// option given.
pub fn resolve_kind(opts: &ModelOptions) -> Result<ModelKind> {
    let debug = !opts.debug.is_empty();
    let pdfax = opts.pdfax.any();
    let pdf = pdfax || opts.pdf.any();
    if debug && pdf {
        return Err(GsError::UnsupportedSelection(
            Selection::ModelKind,
            "debug switches cannot be combined with PDF options".into(),
        ));
    }

    let needed = if debug {
        ModelKind::Debug
    } else if pdfax {
        ModelKind::Pdfax
    } else if pdf {
        ModelKind::Pdf
    } else {
        ModelKind::Base
    };

    match opts.kind {
        None => Ok(needed),
        Some(kind)
            if needed == ModelKind::Base
                || kind == needed
                || (kind == ModelKind::Pdfax && needed == ModelKind::Pdf) =>
        {
            Ok(kind)
        }
        Some(kind) => Err(GsError::UnsupportedSelection(
            Selection::ModelKind,
            format!(
                "the {} model cannot take the options given; they need the {} model",
                kind_name(kind),
                kind_name(needed)
            ),
        )),
    }
}

/// Build the model described by `opts`, filling gaps from `settings`.
#[instrument(skip_all)]
pub fn build_model(opts: &ModelOptions, settings: &AppSettings) -> Result<Model> {
    let kind = resolve_kind(opts)?;
    let mut model = Model::empty(kind);
    apply_base(model.params_mut().base_mut(), &opts.base, settings)?;

    match &mut model {
        Model::Base(_) => {}
        Model::Debug(params) => apply_debug(params, &opts.debug)?,
        Model::Pdf(params) => apply_pdf(params, &opts.pdf)?,
        Model::PdfAx(params) => {
            apply_pdf(params.pdf_mut(), &opts.pdf)?;
            apply_pdfax(params, &opts.pdfax, settings)?;
        }
    }
    debug!(kind = kind_name(model.kind()), "model built");
    Ok(model)
}

/// Serialize `model` and append the extra user arguments.
///
/// `--extra` replaces the saved `user_args` for this invocation.
pub fn tokens(model: &Model, opts: &ModelOptions, settings: &AppSettings) -> Result<Vec<String>> {
    let mut args = model.params().to_args(&opts.host())?;
    let extra = opts.extra.as_deref().unwrap_or(&settings.user_args);
    args.extend(split_user_args(extra));
    Ok(args)
}

/// Device named on the command line, else the saved selection.
pub fn resolve_device(opts: &BaseOptions, settings: &AppSettings) -> Result<Option<String>> {
    if let Some(device) = &opts.device {
        return Ok(Some(device.clone()));
    }
    if let Some(index) = opts.device_index {
        return device_for_index(index).map(|d| Some(d.to_string()));
    }
    if settings.device_index < 0 {
        return Ok(None);
    }
    match device_for_index(settings.device_index) {
        Ok(device) => Ok(Some(device.to_string())),
        Err(err) => {
            warn!(index = settings.device_index, %err, "ignoring saved device index");
            Ok(None)
        }
    }
}

fn apply_base(base: &mut BaseParams, opts: &BaseOptions, settings: &AppSettings) -> Result<()> {
    if let Some(device) = resolve_device(opts, settings)? {
        base.set_device(device);
    }
    if let Some(output) = &opts.output {
        base.set_output_file(output.as_str());
    }
    base.set_quiet(!opts.verbose);
    base.set_batch(!opts.interactive);
    base.set_no_page_prompt(opts.no_page_prompt);
    base.set_no_pause(opts.no_pause);
    base.set_no_prompt(opts.no_prompt);
    base.set_no_safer(opts.no_safer);
    base.set_short_errors(opts.short_errors);
    if let Some(bits) = opts.display_format {
        base.set_display_format(DisplayFormat::new(bits));
    }
    if let Some(dpi) = opts.display_resolution {
        base.set_display_resolution(dpi);
    }
    for dir in &opts.include {
        base.add_source_path(dir)?;
    }
    if let Some(dir) = &opts.font_resource_dir {
        base.set_font_resource_dir(dir.as_str());
    }
    if let Some(dir) = &opts.generic_resource_dir {
        base.set_generic_resource_dir(dir.as_str());
    }
    Ok(())
}

fn apply_debug(params: &mut DebugParams, switches: &[String]) -> Result<()> {
    for name in switches {
        let flag = DebugFlags::from_switch(name).ok_or_else(|| {
            GsError::UnsupportedSelection(
                Selection::DebugSwitch,
                format!("unknown debug switch {name}"),
            )
        })?;
        params.set(flag, true);
    }
    Ok(())
}

fn apply_pdf(params: &mut PdfParams, opts: &PdfOptions) -> Result<()> {
    if let Some(strategy) = opts.color_strategy {
        params.set_color_conversion_strategy(strategy.into());
    }
    params.set_embed_all_fonts(opts.embed_all_fonts);
    params.set_new_pdf(opts.new_pdf);
    params.set_pdf_info(opts.pdf_info);
    params.set_fit_page(opts.fit_page);
    if let Some(title) = &opts.title {
        params.set_title(title.as_str());
    }
    params.set_use_bleed_box(opts.use_bleed_box);
    params.set_use_trim_box(opts.use_trim_box);
    params.set_use_art_box(opts.use_art_box);
    params.set_use_crop_box(opts.use_crop_box);
    if let Some(password) = &opts.password {
        params.set_password(password.as_str());
    }
    params.set_show_annots(!opts.hide_annots);
    params.set_show_acro_form(!opts.hide_acro_form);
    params.set_no_user_unit(opts.no_user_unit);
    params.set_render_tt_notdef(opts.render_tt_notdef);
    if let Some(page) = opts.first_page {
        params.set_first_page(page)?;
    }
    if let Some(page) = opts.last_page {
        params.set_last_page(page)?;
    }
    if let Some(list) = &opts.page_list {
        params.set_page_list(list.as_str());
    }
    params.set_subset_fonts(!opts.no_subset_fonts);
    Ok(())
}

fn apply_pdfax(
    params: &mut PdfAxParams,
    opts: &PdfAxOptions,
    settings: &AppSettings,
) -> Result<()> {
    if let Some(level) = opts.pdfa {
        params.set_pdf_a_profile(level)?;
        params.pdf_mut().set_pdf_a(true);
    }
    if opts.pdfx {
        params.pdf_mut().set_pdf_x(true);
    }
    if let Some(policy) = opts.compat_policy {
        params.set_compatibility_policy(policy.into());
    }
    if let Some(id) = &opts.output_condition {
        params.set_output_condition_identifier(id.as_str());
    }
    if let Some(icc) = &opts.icc_profile {
        params.set_icc_profile(locate_icc(icc, &settings.icc_dir))?;
    }
    Ok(())
}

/// Relative profile names that do not exist here are looked up in the saved
/// ICC directory.
fn locate_icc(path: &Path, icc_dir: &str) -> PathBuf {
    if path.is_relative() && !path.exists() && !icc_dir.is_empty() {
        let candidate = Path::new(icc_dir).join(path);
        if candidate.exists() {
            return candidate;
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gsargs_params::path::canonicalize;

    use crate::cli::{Cli, Command};

    fn options(args: &[&str]) -> ModelOptions {
        let argv = ["gsargs", "args"].iter().chain(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Args(cmd) => cmd.model,
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn build(args: &[&str]) -> Result<Vec<String>> {
        let opts = options(args);
        let settings = AppSettings::default();
        let model = build_model(&opts, &settings)?;
        tokens(&model, &opts, &settings)
    }

    #[test]
    fn kind_is_inferred_from_options() {
        assert_eq!(resolve_kind(&options(&[])).unwrap(), ModelKind::Base);
        assert_eq!(
            resolve_kind(&options(&["--debug", "PDFDEBUG"])).unwrap(),
            ModelKind::Debug
        );
        assert_eq!(
            resolve_kind(&options(&["--first-page", "2"])).unwrap(),
            ModelKind::Pdf
        );
        assert_eq!(resolve_kind(&options(&["--pdfx"])).unwrap(), ModelKind::Pdfax);
    }

    #[test]
    fn explicit_kind_must_cover_the_options() {
        assert_eq!(
            resolve_kind(&options(&["--kind", "pdfax", "--title", "T"])).unwrap(),
            ModelKind::Pdfax
        );
        assert_eq!(
            resolve_kind(&options(&["--kind", "debug"])).unwrap(),
            ModelKind::Debug
        );
        assert!(matches!(
            resolve_kind(&options(&["--kind", "pdf", "--pdfx"])),
            Err(GsError::UnsupportedSelection(Selection::ModelKind, _))
        ));
        assert!(resolve_kind(&options(&["--debug", "CMAPDEBUG", "--title", "T"])).is_err());
    }

    #[test]
    fn pdf_options_become_tokens() {
        let args = build(&[
            "-d",
            "pdfwrite",
            "-o",
            "out.pdf",
            "--color-strategy",
            "rgb",
            "--first-page",
            "2",
            "--hide-annots",
        ])
        .unwrap();
        assert_eq!(
            args,
            [
                "-sDEVICE=pdfwrite",
                "-sOutputFile=out.pdf",
                "-sColorConversionStrategy=RGB",
                "-dShowAnnots=false",
                "-dFirstPage=2",
            ]
        );
    }

    #[test]
    fn pdfx_with_unchanged_color_is_refused() {
        let err = build(&["--pdfx", "--color-strategy", "unchanged"]).unwrap_err();
        assert!(matches!(err, GsError::ConformanceViolation(_)));
    }

    #[test]
    fn bad_values_surface_as_range_errors() {
        assert!(matches!(
            build(&["--pdfa", "4"]),
            Err(GsError::OutOfRange { field: "PDFA", value: 4 })
        ));
        assert!(matches!(
            build(&["--first-page", "0"]),
            Err(GsError::OutOfRange { .. })
        ));
        assert!(build(&["--debug", "NOSUCHDEBUG"]).is_err());
    }

    #[test]
    fn debug_switches_follow_base_tokens() {
        let args =
            build(&["--short-errors", "--debug", "ttfdebug", "--debug", "CFFDEBUG"]).unwrap();
        assert_eq!(args, ["-dSHORTERRORS", "-dCFFDEBUG", "-dTTFDEBUG"]);
    }

    #[test]
    fn verbose_and_interactive_turn_off_defaults() {
        let args = build(&["--verbose", "--interactive"]).unwrap();
        assert_eq!(args, ["-dQUIET=false", "-dBATCH=false"]);
    }

    #[test]
    fn extra_arguments_come_last() {
        let args = build(&["--no-pause", "--extra", "-dFoo \"-sBar=a b\""]).unwrap();
        assert_eq!(args, ["-dNOPAUSE", "-dFoo", "-sBar=a b"]);
    }

    #[test]
    fn saved_user_args_apply_without_extra() {
        let opts = options(&[]);
        let settings = AppSettings {
            user_args: "-dSAFER".into(),
            ..AppSettings::default()
        };
        let model = build_model(&opts, &settings).unwrap();
        assert_eq!(tokens(&model, &opts, &settings).unwrap(), ["-dSAFER"]);
    }

    #[test]
    fn device_falls_back_to_saved_index() {
        let mut settings = AppSettings {
            device_index: 1,
            ..AppSettings::default()
        };
        let opts = options(&[]);
        assert_eq!(
            resolve_device(&opts.base, &settings).unwrap().as_deref(),
            Some("pdfwrite")
        );

        let opts = options(&["--device-index", "2"]);
        assert_eq!(
            resolve_device(&opts.base, &settings).unwrap().as_deref(),
            Some("ps2write")
        );

        settings.device_index = 999;
        assert_eq!(resolve_device(&options(&[]).base, &settings).unwrap(), None);
        assert!(resolve_device(&options(&["--device-index", "999"]).base, &settings).is_err());
    }

    #[test]
    fn display_device_takes_host_format() {
        let args = build(&["-d", "display", "--host-depth", "8", "--host-dpi", "120"]).unwrap();
        assert_eq!(args[0], "-sDEVICE=display");
        assert!(args[1].starts_with("-dDisplayFormat="));
        assert_eq!(args[2], "-dDisplayResolution=120");
    }

    #[test]
    fn icc_profile_is_found_in_saved_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fogra.icc"), b"icc").unwrap();
        let icc_dir = canonicalize(&dir.path().to_string_lossy());

        let opts = options(&["--pdfa", "2", "--icc-profile", "fogra.icc"]);
        let settings = AppSettings {
            icc_dir: icc_dir.clone(),
            ..AppSettings::default()
        };
        let model = build_model(&opts, &settings).unwrap();
        let Model::PdfAx(params) = &model else {
            panic!("expected the pdfax model");
        };
        assert!(params.icc_profile().ends_with("/fogra.icc"));

        let args = tokens(&model, &opts, &settings).unwrap();
        assert!(args.contains(&"-dPDFA=2".to_string()));
        assert!(args.iter().any(|t| t.starts_with("-I")));
    }

    #[test]
    fn missing_icc_profile_is_reported() {
        let err = build(&["--pdfx", "--icc-profile", "/no/such/profile.icc"]).unwrap_err();
        assert!(matches!(err, GsError::FileNotFound(_)));
    }

    #[test]
    fn include_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let ok = dir.path().to_string_lossy().into_owned();
        let args = build(&["-I", ok.as_str()]).unwrap();
        assert_eq!(args, [format!("-I{}", canonicalize(&ok))]);

        assert!(matches!(
            build(&["-I", "/no/such/dir"]),
            Err(GsError::DirectoryNotFound(_))
        ));
    }
}
