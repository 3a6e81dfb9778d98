//! Video controller and font memory abstraction
//!
//! The effect core only talks to hardware through two narrow traits:
//! - `VideoSink`: an auto-incrementing write cursor into video memory
//! - `FontMemory`: byte writes into CPU-visible font memory plus charset activation
//!
//! `memory` provides in-memory implementations (used by tests and as the
//! backing store of the terminal host), `terminal` draws that memory with crossterm.

pub mod memory;
pub mod terminal;

pub use memory::{FontRam, Vram};
pub use terminal::TerminalDisplay;

use crate::consts::{CELL_STRIDE, SCREEN_BASE, TEXT_MAP_WIDTH};

/// Register-level view of a video controller data port
pub trait VideoSink {
    /// Point the data port at `address`
    fn set_cursor(&mut self, address: u32);
    /// Bytes the cursor advances after each data write
    fn set_stride(&mut self, stride: u8);
    /// Write through the data port, then advance the cursor
    fn write_data(&mut self, value: u8);
}

impl<S: VideoSink + ?Sized> VideoSink for &mut S {
    fn set_cursor(&mut self, address: u32) {
        (**self).set_cursor(address);
    }

    fn set_stride(&mut self, stride: u8) {
        (**self).set_stride(stride);
    }

    fn write_data(&mut self, value: u8) {
        (**self).write_data(value);
    }
}

/// Memory the display reads glyph bitmaps from
pub trait FontMemory {
    /// Volatile-style byte store at a CPU address
    fn write_byte(&mut self, address: u16, value: u8);
    /// Activate the 2 KiB region at `base` as character set slot 0
    fn install_charset(&mut self, base: u16);
}

/// Where each text row starts in video memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoLayout {
    /// Address of cell (0, 0)
    pub base: u32,
    /// Distance in bytes between the first cells of consecutive rows
    pub row_stride: u32,
}

impl VideoLayout {
    /// Hardware text layer: rows are `TEXT_MAP_WIDTH` cells apart
    pub const TEXT_MAP: VideoLayout = VideoLayout {
        base: SCREEN_BASE,
        row_stride: CELL_STRIDE as u32 * TEXT_MAP_WIDTH,
    };

    /// Rows packed back to back, `cols` cells each
    pub const fn packed(cols: usize) -> Self {
        Self {
            base: SCREEN_BASE,
            row_stride: CELL_STRIDE as u32 * cols as u32,
        }
    }

    #[inline]
    pub const fn row_address(&self, row: usize) -> u32 {
        self.base + self.row_stride * row as u32
    }

    /// Address of the glyph byte of a cell. The attribute byte follows it.
    #[inline]
    pub const fn cell_address(&self, row: usize, col: usize) -> u32 {
        self.row_address(row) + CELL_STRIDE as u32 * col as u32
    }
}
