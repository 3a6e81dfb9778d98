//! Text Plasma - a fixed-point plasma for character-mode displays
//!
//! Core modules:
//! - `effect`: Deterministic effect core (sine table, RNG, charset, plasma)
//! - `video`: Video controller / font memory abstraction plus in-memory and terminal backends
//! - `machine`: The emulated target wiring charset, video memory and plasma together
//! - `settings`: Host settings (frame cap, glyph style, colors, seed)

pub mod effect;
pub mod machine;
pub mod settings;
pub mod video;

pub use machine::Machine;
pub use settings::{GlyphStyle, Settings};

/// Display profile constants
pub mod consts {
    /// Text grid dimensions
    pub const SCREEN_ROWS: usize = 60;
    pub const SCREEN_COLS: usize = 80;

    /// Font memory base address of the generated charset (CPU address space)
    pub const CHARSET_ADDRESS: u16 = 0x3000;

    /// Video memory address of the first text cell. Stands for 0x1B000 on the
    /// target, whose text map sits in VRAM bank 1; the emulated `Vram` drops the bank bit.
    pub const SCREEN_BASE: u32 = 0xB000;
    /// Bytes per text cell (glyph index + color attribute)
    pub const CELL_STRIDE: u8 = 2;
    /// Width of the hardware text map in cells (wider than the visible grid)
    pub const TEXT_MAP_WIDTH: u32 = 128;

    /// Xorshift seed used for charset generation
    pub const RNG_SEED: u32 = 7;

    /// Charset geometry
    pub const GLYPH_COUNT: usize = 256;
    pub const GLYPH_BYTES: usize = 8;
    pub const CHARSET_BYTES: usize = GLYPH_COUNT * GLYPH_BYTES;
}
