// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF/A and PDF/X conformance options layered on the PDF model.
//
// Both modes need an output ICC profile. The profile's directory is added to
// the engine search path when serializing, so the engine can open it by name
// from its own PostScript definition files.

use std::path::Path;

use gsargs_core::error::{GsError, Result};
use gsargs_core::types::{CompatibilityPolicy, HostDisplay};
use tracing::{debug, info, instrument};

use crate::base::BaseParams;
use crate::emit::{emit_str, push_bool, push_int};
use crate::model::EngineParams;
use crate::path::{parent_dir, resolve_existing};
use crate::pdf::PdfParams;

/// PDF/A part produced when none is chosen.
pub const DEFAULT_PDF_A_PROFILE: i32 = 3;

/// Conformance settings for PDF/A and PDF/X output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfAxParams {
    pdf: PdfParams,
    icc_profile: String,
    pdf_a_profile: i32,
    compatibility_policy: CompatibilityPolicy,
    output_condition_identifier: String,
}

impl Default for PdfAxParams {
    fn default() -> Self {
        Self {
            pdf: PdfParams::default(),
            icc_profile: String::new(),
            pdf_a_profile: DEFAULT_PDF_A_PROFILE,
            compatibility_policy: CompatibilityPolicy::Stop,
            output_condition_identifier: String::new(),
        }
    }
}

impl PdfAxParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pdf(&self) -> &PdfParams {
        &self.pdf
    }

    pub fn pdf_mut(&mut self) -> &mut PdfParams {
        &mut self.pdf
    }

    /// Canonical absolute path of the output ICC profile, or empty.
    pub fn icc_profile(&self) -> &str {
        &self.icc_profile
    }

    /// Point at an ICC profile. An empty path clears it.
    ///
    /// The file must exist with exactly this spelling; on failure the
    /// previous profile is kept.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn set_icc_profile(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            self.icc_profile.clear();
            return Ok(());
        }
        let resolved = resolve_existing(path, false)?;
        info!(profile = %resolved, "ICC profile set");
        self.icc_profile = resolved;
        Ok(())
    }

    pub fn pdf_a_profile(&self) -> i32 {
        self.pdf_a_profile
    }

    /// PDF/A part: 1, 2 or 3.
    pub fn set_pdf_a_profile(&mut self, profile: i32) -> Result<()> {
        if !(1..=3).contains(&profile) {
            return Err(GsError::OutOfRange {
                field: "PDFA",
                value: profile.into(),
            });
        }
        self.pdf_a_profile = profile;
        Ok(())
    }

    pub fn compatibility_policy(&self) -> CompatibilityPolicy {
        self.compatibility_policy
    }

    pub fn set_compatibility_policy(&mut self, policy: CompatibilityPolicy) {
        self.compatibility_policy = policy;
    }

    pub fn output_condition_identifier(&self) -> &str {
        &self.output_condition_identifier
    }

    pub fn set_output_condition_identifier(&mut self, identifier: impl Into<String>) {
        self.output_condition_identifier = identifier.into();
    }

    fn conformance_mode(&self) -> bool {
        self.pdf.pdf_a() || self.pdf.pdf_x()
    }
}

impl EngineParams for PdfAxParams {
    fn base(&self) -> &BaseParams {
        self.pdf.base()
    }

    fn base_mut(&mut self) -> &mut BaseParams {
        self.pdf.base_mut()
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn write_args(&self, host: &HostDisplay, out: &mut Vec<String>) -> Result<()> {
        let mut sources = self.base().source_paths().clone();
        if self.conformance_mode() {
            if let Some(dir) = parent_dir(&self.icc_profile) {
                debug!(dir, "registering ICC profile directory");
                sources.add(dir)?;
            }
        }

        self.pdf.write_pdf_args(host, &sources, out)?;

        let defaults = Self::default();
        if self.pdf.pdf_a() {
            push_int(out, self.pdf_a_profile, "-dPDFA=");
            push_int(
                out,
                self.compatibility_policy.engine_value(),
                "-dPDFACompatibilityPolicy=",
            );
        } else if self.pdf.pdf_x() {
            push_bool(out, true, "-dPDFX");
        }
        if self.conformance_mode() {
            emit_str(out, &self.icc_profile, &defaults.icc_profile, "-sICCProfile=");
        }
        emit_str(
            out,
            &self.output_condition_identifier,
            &defaults.output_condition_identifier,
            "-sPDFOutputConditionIdentifier=",
        );
        Ok(())
    }
}
