//! Dithered glyph gradient
//!
//! Each of the 256 glyphs is built against one sine-table entry used as a
//! threshold: a pixel is lit when a random byte is strictly greater than it.
//! Low thresholds give nearly solid glyphs, high thresholds nearly empty
//! ones, so indexing the charset by a plasma value yields a dithered shade.

use bytemuck::{Pod, Zeroable};
use rand::RngCore;

use super::sine::SINE_TABLE;
use crate::consts::{CHARSET_BYTES, GLYPH_BYTES, GLYPH_COUNT};
use crate::video::FontMemory;

/// An 8x8 one-bit glyph, one byte per pixel row. Bit 7 is the leftmost pixel.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Glyph(pub [u8; GLYPH_BYTES]);

impl Glyph {
    pub const EMPTY: Glyph = Glyph([0x00; GLYPH_BYTES]);
    pub const SOLID: Glyph = Glyph([0xFF; GLYPH_BYTES]);

    /// Pixel rows, top to bottom
    #[inline]
    pub fn rows(&self) -> &[u8; GLYPH_BYTES] {
        &self.0
    }

    /// Number of lit pixels (0..=64)
    pub fn population(&self) -> u32 {
        self.rows().iter().map(|row| row.count_ones()).sum()
    }

    /// Whether pixel (x, y) is lit. Coordinates outside 0..8 read as unlit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < 8 && y < GLYPH_BYTES && self.rows()[y] & (0x80 >> x) != 0
    }
}

/// Build one glyph row: eight draws, bit 0 first.
#[inline]
fn dither_row<R: RngCore + ?Sized>(threshold: u8, rng: &mut R) -> u8 {
    let mut row = 0u8;
    for bit in 0..8 {
        if (rng.next_u32() & 0xFF) as u8 > threshold {
            row |= 1 << bit;
        }
    }
    row
}

/// The full 256-glyph set, contiguous with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    glyphs: [Glyph; GLYPH_COUNT],
}

impl Charset {
    /// Generate the gradient. Consumes one draw per pixel, `CHARSET_BYTES * 8` in total.
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut glyphs = [Glyph::EMPTY; GLYPH_COUNT];
        for (glyph, &threshold) in glyphs.iter_mut().zip(SINE_TABLE.iter()) {
            for row in glyph.0.iter_mut() {
                *row = dither_row(threshold, rng);
            }
        }
        Self { glyphs }
    }

    /// Glyph for a cell value
    #[inline]
    pub fn glyph(&self, index: u8) -> Glyph {
        self.glyphs[index as usize]
    }

    pub fn glyphs(&self) -> &[Glyph; GLYPH_COUNT] {
        &self.glyphs
    }

    /// Flat font-memory image (glyph 0 row 0 first)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.glyphs)
    }

    /// Copy the image to font memory at ascending addresses starting at `base`.
    pub fn write_to<M: FontMemory + ?Sized>(&self, mem: &mut M, base: u16) {
        let mut dst = base;
        for &byte in self.as_bytes() {
            mem.write_byte(dst, byte);
            dst = dst.wrapping_add(1);
        }
    }
}

/// Generate a charset and write it into font memory at `base`.
///
/// The caller still has to activate the region with
/// [`FontMemory::install_charset`] before the first frame.
pub fn generate_charset<M, R>(mem: &mut M, base: u16, rng: &mut R) -> Charset
where
    M: FontMemory + ?Sized,
    R: RngCore + ?Sized,
{
    let charset = Charset::generate(rng);
    charset.write_to(mem, base);
    debug_assert_eq!(charset.as_bytes().len(), CHARSET_BYTES);
    charset
}
