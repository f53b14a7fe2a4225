// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared by the parameter models, the engine and the CLI.

use serde::{Deserialize, Serialize};

use crate::error::{GsError, Result, Selection};

/// Name of the engine's on-screen preview device.
pub const DISPLAY_DEVICE: &str = "display";

/// Output devices offered for selection, in presentation order.
///
/// A persisted `device_index` setting indexes into this list.
pub const DEVICES: &[&str] = &[
    DISPLAY_DEVICE,
    "pdfwrite",
    "ps2write",
    "eps2write",
    "png16m",
    "pnggray",
    "jpeg",
    "tiff24nc",
    "txtwrite",
    "bbox",
    "nullpage",
];

/// Look up a device by its position in [`DEVICES`].
pub fn device_for_index(index: i64) -> Result<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| DEVICES.get(i).copied())
        .ok_or_else(|| {
            GsError::UnsupportedSelection(Selection::Device, format!("no device at index {index}"))
        })
}

/// Whether `device` names the on-screen preview device.
pub fn is_display_device(device: &str) -> bool {
    device.eq_ignore_ascii_case(DISPLAY_DEVICE)
}

/// How the engine converts colors when writing PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorConversionStrategy {
    /// No strategy requested; nothing is emitted.
    #[default]
    None,
    Unchanged,
    Rgb,
    Cmyk,
    Gray,
    DeviceIndependent,
}

impl ColorConversionStrategy {
    /// Engine keyword for `-sColorConversionStrategy`, or `None` when unset.
    pub fn engine_name(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Unchanged => Some("LeaveColorUnchanged"),
            Self::Rgb => Some("RGB"),
            Self::Cmyk => Some("CMYK"),
            Self::Gray => Some("Gray"),
            Self::DeviceIndependent => Some("UseDeviceIndependentColor"),
        }
    }

    /// Whether PDF/X output can be produced with this strategy.
    pub fn allowed_for_pdf_x(&self) -> bool {
        matches!(self, Self::Gray | Self::Cmyk)
    }
}

/// What the engine does when a PDF/A run meets a non-conformant construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompatibilityPolicy {
    /// Keep the feature and emit a non-conformant file.
    Continue,
    /// Drop the feature and keep going.
    Ignore,
    /// Abort the run with an error.
    #[default]
    Stop,
}

impl CompatibilityPolicy {
    /// Integer value for `-dPDFACompatibilityPolicy`.
    pub fn engine_value(&self) -> i32 {
        match self {
            Self::Continue => 0,
            Self::Ignore => 1,
            Self::Stop => 2,
        }
    }

    pub fn from_engine_value(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Continue),
            1 => Ok(Self::Ignore),
            2 => Ok(Self::Stop),
            other => Err(GsError::OutOfRange {
                field: "PDFACompatibilityPolicy",
                value: other.into(),
            }),
        }
    }
}

/// Properties of the host display used when previewing on the display device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDisplay {
    /// Bits per pixel of the current screen mode.
    pub color_depth: u32,
    /// Pixel density in dots per inch.
    pub dpi: u32,
}

impl Default for HostDisplay {
    fn default() -> Self {
        Self {
            color_depth: 32,
            dpi: 96,
        }
    }
}
