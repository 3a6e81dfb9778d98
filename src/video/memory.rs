//! In-memory video controller and font memory
//!
//! `Vram` behaves like the controller's data port: a cursor that advances by
//! a configurable stride after every write. `FontRam` is a flat 64 KiB CPU
//! address space with a charset slot.

use super::{FontMemory, VideoLayout, VideoSink};
use crate::consts::{CHARSET_BYTES, GLYPH_BYTES};
use crate::effect::Glyph;

/// Addressable video memory (17-bit address space)
pub const VRAM_SIZE: usize = 0x2_0000;
/// CPU address space
pub const RAM_SIZE: usize = 0x1_0000;

/// Video memory with an auto-incrementing write cursor
#[derive(Debug, Clone)]
pub struct Vram {
    bytes: Vec<u8>,
    cursor: u32,
    stride: u32,
}

impl Default for Vram {
    fn default() -> Self {
        Self::new()
    }
}

impl Vram {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; VRAM_SIZE],
            cursor: 0,
            stride: 0,
        }
    }

    /// Wrap an address into the video address space
    #[inline]
    fn index(address: u32) -> usize {
        address as usize % VRAM_SIZE
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn peek(&self, address: u32) -> u8 {
        self.bytes[Self::index(address)]
    }

    /// Set the attribute byte of every cell in a `rows` x `cols` grid
    pub fn fill_attributes(&mut self, layout: VideoLayout, rows: usize, cols: usize, attribute: u8) {
        for r in 0..rows {
            for c in 0..cols {
                let i = Self::index(layout.cell_address(r, c) + 1);
                self.bytes[i] = attribute;
            }
        }
    }

    /// (glyph index, attribute) of a cell
    pub fn text_cell(&self, layout: VideoLayout, row: usize, col: usize) -> (u8, u8) {
        let addr = layout.cell_address(row, col);
        (self.peek(addr), self.peek(addr + 1))
    }
}

impl VideoSink for Vram {
    fn set_cursor(&mut self, address: u32) {
        self.cursor = Self::index(address) as u32;
    }

    fn set_stride(&mut self, stride: u8) {
        self.stride = u32::from(stride);
    }

    fn write_data(&mut self, value: u8) {
        self.bytes[self.cursor as usize] = value;
        self.cursor = Self::index(self.cursor + self.stride) as u32;
    }
}

/// CPU memory holding the font, plus the active charset slot
#[derive(Debug, Clone)]
pub struct FontRam {
    bytes: Vec<u8>,
    active: Option<u16>,
}

impl Default for FontRam {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRam {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; RAM_SIZE],
            active: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base address of the installed charset, if any
    pub fn active_charset(&self) -> Option<u16> {
        self.active
    }

    /// Bitmap of `index` in the installed charset
    pub fn glyph(&self, index: u8) -> Option<Glyph> {
        let base = self.active?;
        let mut rows = [0u8; GLYPH_BYTES];
        let start = base as usize + index as usize * GLYPH_BYTES;
        for (i, row) in rows.iter_mut().enumerate() {
            *row = self.bytes[(start + i) % RAM_SIZE];
        }
        Some(Glyph(rows))
    }
}

impl FontMemory for FontRam {
    fn write_byte(&mut self, address: u16, value: u8) {
        self.bytes[address as usize] = value;
    }

    fn install_charset(&mut self, base: u16) {
        debug_assert!(base as usize + CHARSET_BYTES <= RAM_SIZE, "charset wraps the address space");
        self.active = Some(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CHARSET_ADDRESS, RNG_SEED};
    use crate::effect::{Charset, Xorshift32, generate_charset};

    #[test]
    fn test_vram_stride_two_skips_attributes() {
        let mut vram = Vram::new();
        vram.set_stride(2);
        vram.set_cursor(0x1000);
        vram.write_data(0xAA);
        vram.write_data(0xBB);
        assert_eq!(vram.cursor(), 0x1004);
        assert_eq!(vram.peek(0x1000), 0xAA);
        assert_eq!(vram.peek(0x1001), 0x00);
        assert_eq!(vram.peek(0x1002), 0xBB);
    }

    #[test]
    fn test_vram_cursor_wraps() {
        let mut vram = Vram::new();
        vram.set_stride(2);
        vram.set_cursor(VRAM_SIZE as u32 - 1);
        vram.write_data(1);
        assert_eq!(vram.cursor(), 1);
        assert_eq!(vram.peek(VRAM_SIZE as u32 - 1), 1);
    }

    #[test]
    fn test_vram_zero_stride_overwrites() {
        let mut vram = Vram::new();
        vram.set_cursor(0x20);
        vram.write_data(1);
        vram.write_data(2);
        assert_eq!(vram.peek(0x20), 2);
        assert_eq!(vram.cursor(), 0x20);
    }

    #[test]
    fn test_fill_attributes() {
        let layout = VideoLayout::TEXT_MAP;
        let mut vram = Vram::new();
        vram.fill_attributes(layout, 2, 3, 0x61);
        assert_eq!(vram.text_cell(layout, 1, 2), (0, 0x61));
        assert_eq!(vram.peek(layout.cell_address(1, 3) + 1), 0);
    }

    #[test]
    fn test_font_ram_glyph_requires_install() {
        let mut ram = FontRam::new();
        let charset = generate_charset(&mut ram, CHARSET_ADDRESS, &mut Xorshift32::new(RNG_SEED));
        assert_eq!(ram.glyph(0), None);

        ram.install_charset(CHARSET_ADDRESS);
        assert_eq!(ram.active_charset(), Some(CHARSET_ADDRESS));
        for index in [0u8, 1, 64, 192, 255] {
            assert_eq!(ram.glyph(index), Some(charset.glyph(index)));
        }
    }

    #[test]
    fn test_font_ram_write_byte() {
        let mut ram = FontRam::new();
        ram.write_byte(0xFFFF, 0x5A);
        assert_eq!(ram.bytes()[0xFFFF], 0x5A);
    }

    #[test]
    fn test_charset_write_to_any_base() {
        let charset = Charset::generate(&mut Xorshift32::default());
        let mut ram = FontRam::new();
        charset.write_to(&mut ram, 0x8000);
        ram.install_charset(0x8000);
        assert_eq!(ram.glyph(255), Some(charset.glyph(255)));
    }
}
