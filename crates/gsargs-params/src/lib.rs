// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gsargs-params — Typed Ghostscript run descriptions and their encoder.
//
// Each model tier embeds the one below it (base → pdf → pdfax, base → debug)
// and writes its tokens after the lower tier's. Only values that differ from
// their defaults become tokens.

pub mod base;
pub mod debug;
pub mod display_format;
pub mod emit;
pub mod model;
pub mod path;
pub mod pdf;
pub mod pdfax;
pub mod user_args;

pub use base::{BASELINE_ARGS, BaseParams, SourcePaths, resolve_effective_display};
pub use debug::{DebugFlags, DebugParams};
pub use display_format::DisplayFormat;
pub use model::EngineParams;
pub use pdf::{PAGE_UNSET, PdfParams};
pub use pdfax::PdfAxParams;
pub use user_args::split_user_args;
