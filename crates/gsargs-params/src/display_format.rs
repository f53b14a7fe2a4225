// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Packed pixel-layout descriptor for the engine's display device.
//
// The engine reads `-dDisplayFormat=<int>` as a bitmask of seven fields. Only
// the composite integer is stored; the fields are read back by masking.

use std::fmt;

pub const COLORS_NATIVE: u32 = 1 << 0;
pub const COLORS_GRAY: u32 = 1 << 1;
pub const COLORS_RGB: u32 = 1 << 2;
pub const COLORS_CMYK: u32 = 1 << 3;
pub const COLORS_SEPARATION: u32 = 1 << 19;
pub const COLORS_MASK: u32 = 0x0008_000f;

pub const ALPHA_NONE: u32 = 0;
pub const ALPHA_FIRST: u32 = 1 << 4;
pub const ALPHA_LAST: u32 = 1 << 5;
pub const UNUSED_FIRST: u32 = 1 << 6;
pub const UNUSED_LAST: u32 = 1 << 7;
pub const ALPHA_MASK: u32 = 0x0000_00f0;

pub const DEPTH_1: u32 = 1 << 8;
pub const DEPTH_2: u32 = 1 << 9;
pub const DEPTH_4: u32 = 1 << 10;
pub const DEPTH_8: u32 = 1 << 11;
pub const DEPTH_12: u32 = 1 << 12;
pub const DEPTH_16: u32 = 1 << 13;
pub const DEPTH_MASK: u32 = 0x0000_ff00;

pub const BIGENDIAN: u32 = 0;
pub const LITTLEENDIAN: u32 = 1 << 16;
pub const ENDIAN_MASK: u32 = 0x0001_0000;

pub const TOPFIRST: u32 = 0;
pub const BOTTOMFIRST: u32 = 1 << 17;
pub const FIRSTROW_MASK: u32 = 0x0002_0000;

pub const NATIVE_555: u32 = 0;
pub const NATIVE_565: u32 = 1 << 18;
pub const MASK_555: u32 = 0x0004_0000;

pub const ROW_ALIGN_DEFAULT: u32 = 0;
pub const ROW_ALIGN_4: u32 = 3 << 20;
pub const ROW_ALIGN_8: u32 = 4 << 20;
pub const ROW_ALIGN_16: u32 = 5 << 20;
pub const ROW_ALIGN_32: u32 = 6 << 20;
pub const ROW_ALIGN_64: u32 = 7 << 20;
pub const ROW_ALIGN_MASK: u32 = 0x0070_0000;

/// Byte order of multi-byte pixels on this host.
pub const HOST_ENDIAN: u32 = if cfg!(target_endian = "little") {
    LITTLEENDIAN
} else {
    BIGENDIAN
};

/// A packed display-format bitmask. Zero means "not chosen".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DisplayFormat(u32);

/// The seven fields of a [`DisplayFormat`], each still in its bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFormatFields {
    pub alpha: u32,
    pub color: u32,
    pub depth: u32,
    pub endian: u32,
    pub first_row: u32,
    pub native_555: u32,
    pub row_align: u32,
}

impl DisplayFormat {
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }

    /// Pick a layout matching a screen of `depth` bits per pixel.
    ///
    /// The branches overlap and are checked in order, so 10 lands on the
    /// `> 8` arm rather than `>= 4`.
    pub const fn from_color_depth(depth: u32) -> Self {
        let bits = if depth == 32 {
            COLORS_RGB | DEPTH_8 | HOST_ENDIAN
        } else if depth == 16 {
            COLORS_NATIVE | DEPTH_16 | NATIVE_555
        } else if depth > 8 {
            COLORS_RGB | DEPTH_8
        } else if depth == 8 {
            COLORS_NATIVE | DEPTH_8
        } else if depth >= 4 {
            COLORS_NATIVE | DEPTH_4
        } else {
            COLORS_NATIVE | DEPTH_1
        };
        Self(bits)
    }

    pub const fn alpha(self) -> u32 {
        self.0 & ALPHA_MASK
    }

    pub const fn color(self) -> u32 {
        self.0 & COLORS_MASK
    }

    pub const fn depth(self) -> u32 {
        self.0 & DEPTH_MASK
    }

    pub const fn endian(self) -> u32 {
        self.0 & ENDIAN_MASK
    }

    pub const fn first_row(self) -> u32 {
        self.0 & FIRSTROW_MASK
    }

    pub const fn native_555(self) -> u32 {
        self.0 & MASK_555
    }

    pub const fn row_align(self) -> u32 {
        self.0 & ROW_ALIGN_MASK
    }

    pub const fn decode(self) -> DisplayFormatFields {
        DisplayFormatFields {
            alpha: self.alpha(),
            color: self.color(),
            depth: self.depth(),
            endian: self.endian(),
            first_row: self.first_row(),
            native_555: self.native_555(),
            row_align: self.row_align(),
        }
    }

    /// Bits per component, or `None` when the depth field is empty or mixed.
    pub const fn bits_per_component(self) -> Option<u32> {
        match self.depth() {
            DEPTH_1 => Some(1),
            DEPTH_2 => Some(2),
            DEPTH_4 => Some(4),
            DEPTH_8 => Some(8),
            DEPTH_12 => Some(12),
            DEPTH_16 => Some(16),
            _ => None,
        }
    }

    /// Row alignment in bytes; `None` means the engine's pointer-size default.
    pub const fn row_alignment_bytes(self) -> Option<u32> {
        match self.row_align() {
            ROW_ALIGN_4 => Some(4),
            ROW_ALIGN_8 => Some(8),
            ROW_ALIGN_16 => Some(16),
            ROW_ALIGN_32 => Some(32),
            ROW_ALIGN_64 => Some(64),
            _ => None,
        }
    }
}

impl From<u32> for DisplayFormat {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
