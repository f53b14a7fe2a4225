// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF input and output options layered on the base model.

use gsargs_core::error::{GsError, Result};
use gsargs_core::types::{ColorConversionStrategy, HostDisplay};
use tracing::{debug, warn};

use crate::base::{BaseParams, SourcePaths};
use crate::emit::{emit_bool, emit_int, emit_str};
use crate::model::EngineParams;

/// Page number meaning "not set".
pub const PAGE_UNSET: i32 = -1;

/// Options for reading and writing PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfParams {
    base: BaseParams,
    color_conversion_strategy: ColorConversionStrategy,
    embed_all_fonts: bool,
    new_pdf: bool,
    pdf_info: bool,
    fit_page: bool,
    title: String,
    use_bleed_box: bool,
    use_trim_box: bool,
    use_art_box: bool,
    use_crop_box: bool,
    password: String,
    show_annots: bool,
    show_acro_form: bool,
    no_user_unit: bool,
    render_tt_notdef: bool,
    first_page: i32,
    last_page: i32,
    page_list: String,
    subset_fonts: bool,
    pdf_a: bool,
    pdf_x: bool,
}

impl Default for PdfParams {
    fn default() -> Self {
        Self {
            base: BaseParams::default(),
            color_conversion_strategy: ColorConversionStrategy::None,
            embed_all_fonts: false,
            new_pdf: false,
            pdf_info: false,
            fit_page: false,
            title: String::new(),
            use_bleed_box: false,
            use_trim_box: false,
            use_art_box: false,
            use_crop_box: false,
            password: String::new(),
            show_annots: true,
            show_acro_form: true,
            no_user_unit: false,
            render_tt_notdef: false,
            first_page: PAGE_UNSET,
            last_page: PAGE_UNSET,
            page_list: String::new(),
            subset_fonts: true,
            pdf_a: false,
            pdf_x: false,
        }
    }
}

fn check_page(field: &'static str, page: i32) -> Result<i32> {
    if page == PAGE_UNSET || page >= 1 {
        Ok(page)
    } else {
        Err(GsError::OutOfRange {
            field,
            value: page.into(),
        })
    }
}

impl PdfParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_conversion_strategy(&self) -> ColorConversionStrategy {
        self.color_conversion_strategy
    }

    pub fn set_color_conversion_strategy(&mut self, strategy: ColorConversionStrategy) {
        self.color_conversion_strategy = strategy;
    }

    pub fn embed_all_fonts(&self) -> bool {
        self.embed_all_fonts
    }

    pub fn set_embed_all_fonts(&mut self, embed: bool) {
        self.embed_all_fonts = embed;
    }

    /// Whether the newer PDF interpreter is requested.
    pub fn new_pdf(&self) -> bool {
        self.new_pdf
    }

    pub fn set_new_pdf(&mut self, new_pdf: bool) {
        self.new_pdf = new_pdf;
    }

    /// Whether the engine dumps document information instead of rendering.
    pub fn pdf_info(&self) -> bool {
        self.pdf_info
    }

    pub fn set_pdf_info(&mut self, pdf_info: bool) {
        self.pdf_info = pdf_info;
    }

    pub fn fit_page(&self) -> bool {
        self.fit_page
    }

    pub fn set_fit_page(&mut self, fit_page: bool) {
        self.fit_page = fit_page;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn use_bleed_box(&self) -> bool {
        self.use_bleed_box
    }

    pub fn set_use_bleed_box(&mut self, on: bool) {
        self.use_bleed_box = on;
    }

    pub fn use_trim_box(&self) -> bool {
        self.use_trim_box
    }

    pub fn set_use_trim_box(&mut self, on: bool) {
        self.use_trim_box = on;
    }

    pub fn use_art_box(&self) -> bool {
        self.use_art_box
    }

    pub fn set_use_art_box(&mut self, on: bool) {
        self.use_art_box = on;
    }

    pub fn use_crop_box(&self) -> bool {
        self.use_crop_box
    }

    pub fn set_use_crop_box(&mut self, on: bool) {
        self.use_crop_box = on;
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn show_annots(&self) -> bool {
        self.show_annots
    }

    pub fn set_show_annots(&mut self, show: bool) {
        self.show_annots = show;
    }

    pub fn show_acro_form(&self) -> bool {
        self.show_acro_form
    }

    pub fn set_show_acro_form(&mut self, show: bool) {
        self.show_acro_form = show;
    }

    pub fn no_user_unit(&self) -> bool {
        self.no_user_unit
    }

    pub fn set_no_user_unit(&mut self, on: bool) {
        self.no_user_unit = on;
    }

    /// Whether missing TrueType glyphs are drawn as the notdef glyph.
    pub fn render_tt_notdef(&self) -> bool {
        self.render_tt_notdef
    }

    pub fn set_render_tt_notdef(&mut self, on: bool) {
        self.render_tt_notdef = on;
    }

    pub fn first_page(&self) -> i32 {
        self.first_page
    }

    /// Accepts a page number from 1, or [`PAGE_UNSET`].
    pub fn set_first_page(&mut self, page: i32) -> Result<()> {
        self.first_page = check_page("FirstPage", page)?;
        Ok(())
    }

    pub fn last_page(&self) -> i32 {
        self.last_page
    }

    /// Accepts a page number from 1, or [`PAGE_UNSET`].
    pub fn set_last_page(&mut self, page: i32) -> Result<()> {
        self.last_page = check_page("LastPage", page)?;
        Ok(())
    }

    pub fn page_list(&self) -> &str {
        &self.page_list
    }

    /// Engine page-list syntax, e.g. `1,3,5-7`. Passed through verbatim.
    pub fn set_page_list(&mut self, list: impl Into<String>) {
        self.page_list = list.into();
    }

    pub fn subset_fonts(&self) -> bool {
        self.subset_fonts
    }

    pub fn set_subset_fonts(&mut self, subset: bool) {
        self.subset_fonts = subset;
    }

    pub fn pdf_a(&self) -> bool {
        self.pdf_a
    }

    /// Turning PDF/A on turns PDF/X off.
    pub fn set_pdf_a(&mut self, on: bool) {
        self.pdf_a = on;
        if on {
            self.pdf_x = false;
        }
    }

    pub fn pdf_x(&self) -> bool {
        self.pdf_x
    }

    /// Turning PDF/X on turns PDF/A off.
    pub fn set_pdf_x(&mut self, on: bool) {
        self.pdf_x = on;
        if on {
            self.pdf_a = false;
        }
    }

    /// Engine name for the color strategy, checked against PDF/X mode.
    fn strategy_name(&self) -> Result<Option<&'static str>> {
        let strategy = self.color_conversion_strategy;
        let Some(name) = strategy.engine_name() else {
            return Ok(None);
        };
        if self.pdf_x && !strategy.allowed_for_pdf_x() {
            warn!(strategy = name, "color strategy rejected for PDF/X");
            return Err(GsError::ConformanceViolation(format!(
                "PDF/X output requires the Gray or CMYK color conversion strategy, not {name}"
            )));
        }
        Ok(Some(name))
    }

    /// Emit the base tier and then this tier's tokens.
    pub(crate) fn write_pdf_args(
        &self,
        host: &HostDisplay,
        sources: &SourcePaths,
        out: &mut Vec<String>,
    ) -> Result<()> {
        self.base.write_base_args(host, sources, out);

        let defaults = Self::default();
        if let Some(name) = self.strategy_name()? {
            out.push(format!("-sColorConversionStrategy={name}"));
        }
        emit_bool(out, self.embed_all_fonts, defaults.embed_all_fonts, "-dEmbedAllFonts=");
        emit_bool(out, self.new_pdf, defaults.new_pdf, "-dNEWPDF=");
        emit_bool(out, self.pdf_info, defaults.pdf_info, "-dPDFINFO");
        emit_bool(out, self.fit_page, defaults.fit_page, "-dPDFFitPage");
        emit_str(out, &self.title, &defaults.title, "-sTitle=");
        emit_bool(out, self.use_bleed_box, defaults.use_bleed_box, "-dUseBleedBox");
        emit_bool(out, self.use_trim_box, defaults.use_trim_box, "-dUseTrimBox");
        emit_bool(out, self.use_art_box, defaults.use_art_box, "-dUseArtBox");
        emit_bool(out, self.use_crop_box, defaults.use_crop_box, "-dUseCropBox");
        emit_str(out, &self.password, &defaults.password, "-sPDFPassword=");
        emit_bool(out, self.show_annots, defaults.show_annots, "-dShowAnnots=");
        emit_bool(out, self.show_acro_form, defaults.show_acro_form, "-dShowAcroForm=");
        emit_bool(out, self.no_user_unit, defaults.no_user_unit, "-dNoUserUnit");
        emit_bool(out, self.render_tt_notdef, defaults.render_tt_notdef, "-dRENDERTTNOTDEF");
        emit_int(out, self.first_page, defaults.first_page, "-dFirstPage=");
        emit_int(out, self.last_page, defaults.last_page, "-dLastPage=");
        emit_str(out, &self.page_list, &defaults.page_list, "-sPageList=");
        emit_bool(out, self.subset_fonts, defaults.subset_fonts, "-dSubsetFonts=");

        debug!(tokens = out.len(), "pdf tier written");
        Ok(())
    }
}

impl EngineParams for PdfParams {
    fn base(&self) -> &BaseParams {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseParams {
        &mut self.base
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn write_args(&self, host: &HostDisplay, out: &mut Vec<String>) -> Result<()> {
        self.write_pdf_args(host, self.base.source_paths(), out)
    }
}
