//! Terminal presenter
//!
//! Reads the emulated text map (glyph index + attribute per cell) and the
//! installed charset, and draws each cell as one terminal character. Only
//! cells that changed since the previous frame are re-sent.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};

use super::{FontRam, VideoLayout, Vram};
use crate::effect::Glyph;
use crate::settings::GlyphStyle;

/// Density ramp, emptiest first
const RAMP: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Default 16-color palette of the text layer (12-bit values widened to 8 bits)
const PALETTE: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00),
    (0xFF, 0xFF, 0xFF),
    (0x88, 0x00, 0x00),
    (0xAA, 0xFF, 0xEE),
    (0xCC, 0x44, 0xCC),
    (0x00, 0xCC, 0x55),
    (0x00, 0x00, 0xAA),
    (0xEE, 0xEE, 0x77),
    (0xDD, 0x88, 0x55),
    (0x66, 0x44, 0x00),
    (0xFF, 0x77, 0x77),
    (0x33, 0x33, 0x33),
    (0x77, 0x77, 0x77),
    (0xAA, 0xFF, 0x66),
    (0x00, 0x88, 0xFF),
    (0xBB, 0xBB, 0xBB),
];

/// Palette entry for a 4-bit color index (upper bits ignored)
pub fn palette_color(index: u8) -> Color {
    let (r, g, b) = PALETTE[(index & 0x0F) as usize];
    Color::Rgb { r, g, b }
}

/// (foreground, background) of an attribute byte
pub fn attribute_colors(attribute: u8) -> (Color, Color) {
    (palette_color(attribute & 0x0F), palette_color(attribute >> 4))
}

// Dot mapping:
// (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
// (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
fn braille_bit(dx: usize, dy: usize) -> u8 {
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

/// One character standing in for an 8x8 glyph
pub fn glyph_char(glyph: Glyph, style: GlyphStyle) -> char {
    match style {
        GlyphStyle::Ramp => {
            let i = glyph.population() as usize * (RAMP.len() - 1) / 64;
            RAMP[i]
        }
        GlyphStyle::Braille => {
            let mut mask = 0u8;
            for dy in 0..4 {
                for dx in 0..2 {
                    if glyph.pixel(dx * 4 + 1, dy * 2) {
                        mask |= braille_bit(dx, dy);
                    }
                }
            }
            char::from_u32(0x2800 + u32::from(mask)).unwrap_or(' ')
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

/// Row-major grid of terminal cells
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    pub w: usize,
    pub h: usize,
    pub cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); w * h],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.idx(x, y)]
    }
}

/// Fill `grid` from the text map at `layout`. Cells without an installed charset read blank.
pub fn compose_cells(
    vram: &Vram,
    font: &FontRam,
    layout: VideoLayout,
    style: GlyphStyle,
    color: bool,
    grid: &mut CellGrid,
) {
    for y in 0..grid.h {
        for x in 0..grid.w {
            let (index, attribute) = vram.text_cell(layout, y, x);
            let ch = font.glyph(index).map_or(' ', |g| glyph_char(g, style));
            let (fg, bg) = if color {
                attribute_colors(attribute)
            } else {
                (Color::Reset, Color::Reset)
            };
            let i = grid.idx(x, y);
            grid.cells[i] = Cell { ch, fg, bg };
        }
    }
}

/// Crossterm-backed display of a `grid_rows` x `grid_cols` text map
pub struct TerminalDisplay {
    out: Stdout,
    grid_rows: usize,
    grid_cols: usize,
    style: GlyphStyle,
    color: bool,
    prev: CellGrid,
    cur: CellGrid,
    full_redraw: bool,
}

impl TerminalDisplay {
    pub fn begin(grid_rows: usize, grid_cols: usize, style: GlyphStyle, color: bool) -> Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )
        .context("entering alternate screen")?;
        let setup = terminal::enable_raw_mode()
            .context("enabling raw mode")
            .and_then(|()| Self::visible(grid_rows, grid_cols));
        let (w, h) = match setup {
            Ok(view) => view,
            Err(e) => {
                Self::restore(&mut out).ok();
                return Err(e);
            }
        };
        log::debug!("Terminal view {}x{} of {}x{} grid", w, h, grid_cols, grid_rows);

        Ok(Self {
            out,
            grid_rows,
            grid_cols,
            style,
            color,
            prev: CellGrid::new(w, h),
            cur: CellGrid::new(w, h),
            full_redraw: true,
        })
    }

    /// Grid area that fits in the terminal
    fn visible(grid_rows: usize, grid_cols: usize) -> Result<(usize, usize)> {
        let (c, r) = terminal::size().context("querying terminal size")?;
        Ok(((c as usize).min(grid_cols), (r as usize).min(grid_rows)))
    }

    pub fn end(&mut self) -> Result<()> {
        Self::restore(&mut self.out)
    }

    /// Undo everything `begin` sets up. Safe to call on a partial setup.
    fn restore<W: Write>(out: &mut W) -> Result<()> {
        let screen = queue!(
            out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )
        .and_then(|()| out.flush());
        // Raw mode is left even when the screen commands fail
        let raw = terminal::disable_raw_mode();
        screen.context("leaving alternate screen")?;
        raw.context("disabling raw mode")?;
        Ok(())
    }

    pub fn resize_if_needed(&mut self) -> Result<bool> {
        let (w, h) = Self::visible(self.grid_rows, self.grid_cols)?;
        if w == self.cur.w && h == self.cur.h {
            return Ok(false);
        }
        log::debug!("Terminal resized, view now {}x{}", w, h);
        self.prev = CellGrid::new(w, h);
        self.cur = CellGrid::new(w, h);
        self.full_redraw = true;
        Ok(true)
    }

    /// True once the user asked to quit (q, Esc or Ctrl-C)
    pub fn poll_quit(&mut self) -> Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match k.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true);
                    }
                    _ => {}
                }
            }
        }
        Ok(false)
    }

    /// Draw the text map as it currently sits in `vram`
    pub fn present(&mut self, vram: &Vram, font: &FontRam, layout: VideoLayout) -> Result<()> {
        compose_cells(vram, font, layout, self.style, self.color, &mut self.cur);

        queue!(self.out, BeginSynchronizedUpdate)?;
        if self.full_redraw {
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
        }

        let mut last_fg = None;
        let mut last_bg = None;
        let mut last_pos = None;

        for y in 0..self.cur.h {
            for x in 0..self.cur.w {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if !self.full_redraw && c == self.prev.cells[i] {
                    continue;
                }

                // Print advances the cursor, skip MoveTo for runs
                if last_pos != Some((x, y)) {
                    queue!(self.out, cursor::MoveTo(x as u16, y as u16))?;
                }
                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }
                queue!(self.out, Print(c.ch))?;
                last_pos = Some((x + 1, y));
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        self.full_redraw = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{CHARSET_ADDRESS, RNG_SEED};
    use crate::effect::{Plasma, Xorshift32, generate_charset};
    use crate::video::FontMemory;

    #[test]
    fn test_ramp_extremes() {
        assert_eq!(glyph_char(Glyph::EMPTY, GlyphStyle::Ramp), ' ');
        assert_eq!(glyph_char(Glyph::SOLID, GlyphStyle::Ramp), '@');
        // 32 of 64 pixels
        let half = Glyph([0xF0; 8]);
        assert_eq!(glyph_char(half, GlyphStyle::Ramp), '=');
    }

    #[test]
    fn test_braille_extremes() {
        assert_eq!(glyph_char(Glyph::EMPTY, GlyphStyle::Braille), '\u{2800}');
        assert_eq!(glyph_char(Glyph::SOLID, GlyphStyle::Braille), '\u{28FF}');
    }

    #[test]
    fn test_braille_left_column() {
        // Only pixel column 1 lit in every row
        let glyph = Glyph([0x40; 8]);
        assert_eq!(glyph_char(glyph, GlyphStyle::Braille), '\u{2847}');
    }

    #[test]
    fn test_restore_emits_teardown_sequence() {
        let mut out: Vec<u8> = Vec::new();
        // Raw mode may be unavailable without a tty; only the screen commands are checked
        let _ = TerminalDisplay::restore(&mut out);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[?1049l"), "alternate screen not left: {text:?}");
        assert!(text.contains("\x1b[?25h"), "cursor not shown: {text:?}");
    }

    #[test]
    fn test_attribute_colors() {
        let (fg, bg) = attribute_colors(0x61);
        assert_eq!(fg, Color::Rgb { r: 0xFF, g: 0xFF, b: 0xFF });
        assert_eq!(bg, Color::Rgb { r: 0x00, g: 0x00, b: 0xAA });
        assert_eq!(palette_color(0x1F), palette_color(0x0F));
    }

    #[test]
    fn test_compose_without_charset_is_blank() {
        let vram = Vram::new();
        let font = FontRam::new();
        let mut grid = CellGrid::new(3, 2);
        compose_cells(&vram, &font, VideoLayout::TEXT_MAP, GlyphStyle::Ramp, false, &mut grid);
        assert!(grid.cells.iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn test_compose_follows_plasma() {
        let layout = VideoLayout::TEXT_MAP;
        let mut font = FontRam::new();
        let charset = generate_charset(&mut font, CHARSET_ADDRESS, &mut Xorshift32::new(RNG_SEED));
        font.install_charset(CHARSET_ADDRESS);

        let mut vram = Vram::new();
        vram.fill_attributes(layout, 4, 4, 0x61);
        let mut plasma = Plasma::<4, 4>::new(layout);
        plasma.update(&mut vram);

        let mut grid = CellGrid::new(4, 4);
        compose_cells(&vram, &font, layout, GlyphStyle::Braille, true, &mut grid);
        for y in 0..4 {
            for x in 0..4 {
                let cell = grid.get(x, y);
                let glyph = charset.glyph(plasma.cell(y, x));
                assert_eq!(cell.ch, glyph_char(glyph, GlyphStyle::Braille));
                assert_eq!((cell.fg, cell.bg), attribute_colors(0x61));
            }
        }
    }
}
