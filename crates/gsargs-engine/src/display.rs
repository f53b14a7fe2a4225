// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page bitmaps delivered by the engine's display device.
//
// An in-process engine hands over each finished page as a raw buffer laid
// out according to the run's display format. The buffers are converted to
// RGBA here and kept by zero-based page index.

use gsargs_core::error::{GsError, Result, Selection};
use gsargs_params::display_format::{
    ALPHA_FIRST, ALPHA_LAST, ALPHA_NONE, BOTTOMFIRST, COLORS_CMYK, COLORS_GRAY, COLORS_NATIVE,
    COLORS_RGB, LITTLEENDIAN, NATIVE_565, UNUSED_FIRST, UNUSED_LAST,
};
use gsargs_params::DisplayFormat;
use image::{Rgba, RgbaImage};
use tracing::debug;

/// One page as the display device left it, before conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    pub format: DisplayFormat,
    pub width: u32,
    pub height: u32,
    /// Bytes from the start of one row to the next, padding included.
    pub raster: usize,
    pub data: Vec<u8>,
}

/// Pages received from one display run.
#[derive(Debug, Default)]
pub struct DisplayPages {
    pages: Vec<RgbaImage>,
}

impl DisplayPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert and store a page delivered as an engine event.
    pub fn push(&mut self, page: &RawPage) -> Result<usize> {
        self.push_raw(page.format, page.width, page.height, page.raster, &page.data)
    }

    /// Convert and store the next page; returns its index.
    pub fn push_raw(
        &mut self,
        format: DisplayFormat,
        width: u32,
        height: u32,
        raster: usize,
        data: &[u8],
    ) -> Result<usize> {
        let image = decode_display_buffer(format, width, height, raster, data)?;
        self.pages.push(image);
        let index = self.pages.len() - 1;
        debug!(index, width, height, "display page stored");
        Ok(index)
    }

    pub fn page(&self, index: usize) -> Option<&RgbaImage> {
        self.pages.get(index)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn into_pages(self) -> Vec<RgbaImage> {
        self.pages
    }
}

/// Colors of the 16-entry palette used by native 4-bit output.
const VGA_PALETTE: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x80],
    [0x00, 0x80, 0x00],
    [0x00, 0x80, 0x80],
    [0x80, 0x00, 0x00],
    [0x80, 0x00, 0x80],
    [0x80, 0x80, 0x00],
    [0xc0, 0xc0, 0xc0],
    [0x80, 0x80, 0x80],
    [0x00, 0x00, 0xff],
    [0x00, 0xff, 0x00],
    [0x00, 0xff, 0xff],
    [0xff, 0x00, 0x00],
    [0xff, 0x00, 0xff],
    [0xff, 0xff, 0x00],
    [0xff, 0xff, 0xff],
];

/// Pixel layouts this module understands.
#[derive(Debug, Clone, Copy)]
enum Layout {
    /// Eight-bit RGB; `alpha_at` is the byte index of the fourth channel.
    Rgb {
        bytes: usize,
        order: [usize; 3],
        alpha_at: Option<usize>,
    },
    Gray8,
    Cmyk8,
    Mono1,
    /// Native 16-bit pixels, 5 bits per channel with green at 5 or 6.
    Packed16 { green_bits: u32, little: bool },
    /// Native 8-bit: 64 colors of 2 bits per channel, then 32 grays.
    Palette8,
    /// Native 4-bit: two palette indices per byte, high nibble first.
    Palette4,
}

impl Layout {
    fn of(format: DisplayFormat) -> Result<Self> {
        let depth = format.bits_per_component();
        let little = format.endian() == LITTLEENDIAN;
        let layout = match (format.color(), depth) {
            (COLORS_RGB, Some(8)) => {
                // Big-endian channel positions; little-endian reverses the
                // whole pixel.
                let (bytes, rgb, alpha) = match format.alpha() {
                    ALPHA_NONE => (3, [0, 1, 2], None),
                    ALPHA_FIRST => (4, [1, 2, 3], Some(0)),
                    UNUSED_FIRST => (4, [1, 2, 3], None),
                    ALPHA_LAST => (4, [0, 1, 2], Some(3)),
                    UNUSED_LAST => (4, [0, 1, 2], None),
                    _ => return Err(unsupported(format)),
                };
                let flip = |i: usize| if little { bytes - 1 - i } else { i };
                Layout::Rgb {
                    bytes,
                    order: rgb.map(flip),
                    alpha_at: alpha.map(flip),
                }
            }
            (COLORS_GRAY, Some(8)) => Layout::Gray8,
            (COLORS_CMYK, Some(8)) => Layout::Cmyk8,
            (COLORS_NATIVE, Some(1)) => Layout::Mono1,
            (COLORS_NATIVE, Some(4)) => Layout::Palette4,
            (COLORS_NATIVE, Some(8)) => Layout::Palette8,
            (COLORS_NATIVE, Some(16)) => Layout::Packed16 {
                green_bits: if format.native_555() == NATIVE_565 { 6 } else { 5 },
                little,
            },
            _ => return Err(unsupported(format)),
        };
        Ok(layout)
    }

    fn row_bytes(&self, width: usize) -> Option<usize> {
        match self {
            Layout::Rgb { bytes, .. } => width.checked_mul(*bytes),
            Layout::Gray8 | Layout::Palette8 => Some(width),
            Layout::Cmyk8 => width.checked_mul(4),
            Layout::Mono1 => Some(width.div_ceil(8)),
            Layout::Packed16 { .. } => width.checked_mul(2),
            Layout::Palette4 => Some(width.div_ceil(2)),
        }
    }

    fn pixel(&self, row: &[u8], x: usize) -> Rgba<u8> {
        match *self {
            Layout::Rgb {
                bytes,
                order,
                alpha_at,
            } => {
                let px = &row[x * bytes..(x + 1) * bytes];
                let alpha = alpha_at.map_or(255, |i| px[i]);
                Rgba([px[order[0]], px[order[1]], px[order[2]], alpha])
            }
            Layout::Gray8 => {
                let v = row[x];
                Rgba([v, v, v, 255])
            }
            Layout::Cmyk8 => {
                let px = &row[x * 4..x * 4 + 4];
                let k = u16::from(px[3]);
                let channel = |c: u8| 255 - (u16::from(c) + k).min(255) as u8;
                Rgba([channel(px[0]), channel(px[1]), channel(px[2]), 255])
            }
            Layout::Mono1 => {
                let set = row[x / 8] & (0x80 >> (x % 8)) != 0;
                let v = if set { 0 } else { 255 };
                Rgba([v, v, v, 255])
            }
            Layout::Packed16 { green_bits, little } => {
                let pair = [row[x * 2], row[x * 2 + 1]];
                let v = if little {
                    u16::from_le_bytes(pair)
                } else {
                    u16::from_be_bytes(pair)
                };
                let b = v & 0x1f;
                let g = (v >> 5) & ((1 << green_bits) - 1);
                let r = (v >> (5 + green_bits)) & 0x1f;
                Rgba([widen(r, 5), widen(g, green_bits), widen(b, 5), 255])
            }
            Layout::Palette8 => {
                let i = row[x];
                if i & 0x40 != 0 {
                    let v = (u16::from(i & 0x1f) * 255 / 31) as u8;
                    Rgba([v, v, v, 255])
                } else {
                    let level = |shift: u8| ((i >> shift) & 3) * 85;
                    Rgba([level(4), level(2), level(0), 255])
                }
            }
            Layout::Palette4 => {
                let byte = row[x / 2];
                let i = if x % 2 == 0 { byte >> 4 } else { byte & 0x0f };
                let [r, g, b] = VGA_PALETTE[usize::from(i)];
                Rgba([r, g, b, 255])
            }
        }
    }
}

/// Scale a channel of `bits` bits to the full 8-bit range.
fn widen(value: u16, bits: u32) -> u8 {
    ((value << (8 - bits)) | (value >> (2 * bits - 8))) as u8
}

fn unsupported(format: DisplayFormat) -> GsError {
    GsError::UnsupportedSelection(
        Selection::DisplayFormat,
        format!("display format {format} cannot be converted"),
    )
}

/// Convert one raw display buffer to RGBA.
///
/// `raster` is the byte distance between rows, which may include padding.
pub fn decode_display_buffer(
    format: DisplayFormat,
    width: u32,
    height: u32,
    raster: usize,
    data: &[u8],
) -> Result<RgbaImage> {
    let layout = Layout::of(format)?;
    let (w, h) = (width as usize, height as usize);
    let too_large = || GsError::Engine(format!("a {width}x{height} display page is too large"));
    let row_bytes = layout.row_bytes(w).ok_or_else(too_large)?;
    if raster < row_bytes {
        return Err(GsError::Engine(format!(
            "raster {raster} shorter than a {width}-pixel row ({row_bytes} bytes)"
        )));
    }
    let needed = match h {
        0 => 0,
        _ => raster
            .checked_mul(h - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .ok_or_else(too_large)?,
    };
    if data.len() < needed {
        return Err(GsError::Engine(format!(
            "display buffer holds {} bytes, page needs {needed}",
            data.len()
        )));
    }

    let bottom_first = format.first_row() == BOTTOMFIRST;
    let mut image = RgbaImage::new(width, height);
    for src_y in 0..h {
        let start = src_y * raster;
        let row = &data[start..start + row_bytes];
        let y = if bottom_first { h - 1 - src_y } else { src_y };
        for x in 0..w {
            image.put_pixel(x as u32, y as u32, layout.pixel(row, x));
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsargs_params::display_format::{
        COLORS_SEPARATION, DEPTH_1, DEPTH_16, DEPTH_4, DEPTH_8, HOST_ENDIAN,
    };

    fn fmt(bits: u32) -> DisplayFormat {
        DisplayFormat::new(bits)
    }

    #[test]
    fn rgb_big_endian_with_padding() {
        // 2x1 pixels, 3 bytes each, raster padded to 8.
        let data = [255, 0, 0, 0, 0, 255, 9, 9];
        let img = decode_display_buffer(fmt(COLORS_RGB | DEPTH_8), 2, 1, 8, &data).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn little_endian_is_bgr() {
        let data = [10, 20, 30];
        let img =
            decode_display_buffer(fmt(COLORS_RGB | DEPTH_8 | LITTLEENDIAN), 1, 1, 3, &data)
                .unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([30, 20, 10, 255]));
    }

    #[test]
    fn unused_and_alpha_bytes() {
        // Big-endian xRGB: first byte ignored.
        let data = [99, 1, 2, 3];
        let img =
            decode_display_buffer(fmt(COLORS_RGB | UNUSED_FIRST | DEPTH_8), 1, 1, 4, &data)
                .unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));

        // Little-endian with alpha last in the big-endian sense: memory ABGR.
        let data = [128, 3, 2, 1];
        let img = decode_display_buffer(
            fmt(COLORS_RGB | ALPHA_LAST | DEPTH_8 | LITTLEENDIAN),
            1,
            1,
            4,
            &data,
        )
        .unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([1, 2, 3, 128]));
    }

    #[test]
    fn gray_bottom_first_is_flipped() {
        let data = [1, 2];
        let img =
            decode_display_buffer(fmt(COLORS_GRAY | DEPTH_8 | BOTTOMFIRST), 1, 2, 1, &data)
                .unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([2, 2, 2, 255]));
        assert_eq!(img.get_pixel(0, 1), &Rgba([1, 1, 1, 255]));
    }

    #[test]
    fn cmyk_to_rgb() {
        let data = [255, 0, 0, 0, 0, 0, 0, 255];
        let img = decode_display_buffer(fmt(COLORS_CMYK | DEPTH_8), 2, 1, 8, &data).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 255, 255, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn mono_bits_are_black() {
        let data = [0b1010_0000];
        let img = decode_display_buffer(fmt(COLORS_NATIVE | DEPTH_1), 3, 1, 1, &data).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(2, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn host_derived_32_bit_format_decodes() {
        let format = DisplayFormat::from_color_depth(32);
        let data = [7, 8, 9];
        let img = decode_display_buffer(format, 1, 1, 3, &data).unwrap();
        let expected = if HOST_ENDIAN == LITTLEENDIAN {
            Rgba([9, 8, 7, 255])
        } else {
            Rgba([7, 8, 9, 255])
        };
        assert_eq!(img.get_pixel(0, 0), &expected);
    }

    #[test]
    fn short_buffers_are_rejected() {
        let format = fmt(COLORS_GRAY | DEPTH_8);
        assert!(matches!(
            decode_display_buffer(format, 4, 2, 4, &[0; 7]),
            Err(GsError::Engine(_))
        ));
        assert!(decode_display_buffer(format, 4, 1, 3, &[0; 8]).is_err());
    }

    #[test]
    fn oversized_pages_are_rejected_without_overflow() {
        let format = fmt(COLORS_GRAY | DEPTH_8);
        assert!(matches!(
            decode_display_buffer(format, 1, u32::MAX, usize::MAX / 2, &[0; 4]),
            Err(GsError::Engine(_))
        ));
    }

    #[test]
    fn host_derived_16_bit_format_decodes() {
        // 555 big-endian: pure red, then pure green.
        let format = DisplayFormat::from_color_depth(16);
        let data = [0x7c, 0x00, 0x03, 0xe0];
        let img = decode_display_buffer(format, 2, 1, 4, &data).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn native_565_little_endian() {
        let format = fmt(COLORS_NATIVE | DEPTH_16 | NATIVE_565 | LITTLEENDIAN);
        // 0x07e0 is full green in 565; 0x0010 is half blue.
        let data = [0xe0, 0x07, 0x10, 0x00];
        let img = decode_display_buffer(format, 2, 1, 4, &data).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([0, 0, 132, 255]));
    }

    #[test]
    fn host_derived_8_bit_palette() {
        let format = DisplayFormat::from_color_depth(8);
        // 0b00_11_00_10: full red, no green, two thirds blue; then gray 31.
        let data = [0b0011_0010, 0x5f];
        let img = decode_display_buffer(format, 2, 1, 2, &data).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 0, 170, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn host_derived_4_bit_palette() {
        let format = DisplayFormat::from_color_depth(4);
        assert_eq!(format, fmt(COLORS_NATIVE | DEPTH_4));
        let data = [0xc7, 0x10];
        let img = decode_display_buffer(format, 3, 1, 2, &data).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([192, 192, 192, 255]));
        assert_eq!(img.get_pixel(2, 0), &Rgba([0, 0, 128, 255]));
    }

    #[test]
    fn separation_formats_are_unsupported() {
        let format = fmt(COLORS_SEPARATION | DEPTH_8);
        let err = decode_display_buffer(format, 1, 1, 1, &[0]).unwrap_err();
        assert!(matches!(
            err,
            GsError::UnsupportedSelection(Selection::DisplayFormat, _)
        ));
    }

    #[test]
    fn pages_are_indexed_from_zero() {
        let mut pages = DisplayPages::new();
        let format = fmt(COLORS_GRAY | DEPTH_8);
        assert_eq!(pages.push_raw(format, 1, 1, 1, &[10]).unwrap(), 0);
        assert_eq!(pages.push_raw(format, 1, 1, 1, &[20]).unwrap(), 1);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.page(1).unwrap().get_pixel(0, 0), &Rgba([20, 20, 20, 255]));
        assert!(pages.page(2).is_none());

        let raw = RawPage {
            format,
            width: 1,
            height: 1,
            raster: 1,
            data: vec![30],
        };
        assert_eq!(pages.push(&raw).unwrap(), 2);
    }
}
