//! Plasma frame update
//!
//! Two 1-D sine sums, one per row and one per column, are rebuilt every
//! frame from four 8-bit phase accumulators. The value of a cell is the
//! wrapping sum of its row and column entries and is used directly as a
//! glyph index. All arithmetic is modulo 256; the wraparound is what makes
//! the pattern periodic.

use super::sine::sine;
use crate::consts::{CELL_STRIDE, SCREEN_COLS, SCREEN_ROWS};
use crate::video::{VideoLayout, VideoSink};

/// Phase increments for one buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSteps {
    /// Added to the two running phases between consecutive entries
    pub per_cell: [u8; 2],
    /// Added to the two stored phases after the buffer is rebuilt
    pub per_frame: [i8; 2],
}

/// Row buffer steps
pub const ROW_STEPS: PhaseSteps = PhaseSteps {
    per_cell: [4, 9],
    per_frame: [3, -5],
};

/// Column buffer steps
pub const COL_STEPS: PhaseSteps = PhaseSteps {
    per_cell: [3, 7],
    per_frame: [2, -3],
};

/// The four phase accumulators. This is the entire animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Phases {
    pub row_a: u8,
    pub row_b: u8,
    pub col_a: u8,
    pub col_b: u8,
}

impl Phases {
    /// Apply one frame's worth of per-frame steps
    pub fn advance(&mut self) {
        self.row_a = self.row_a.wrapping_add_signed(ROW_STEPS.per_frame[0]);
        self.row_b = self.row_b.wrapping_add_signed(ROW_STEPS.per_frame[1]);
        self.col_a = self.col_a.wrapping_add_signed(COL_STEPS.per_frame[0]);
        self.col_b = self.col_b.wrapping_add_signed(COL_STEPS.per_frame[1]);
    }
}

/// Value shown in a cell: wrapping 8-bit sum, never widened or saturated.
#[inline(always)]
pub const fn cell_value(row: u8, col: u8) -> u8 {
    row.wrapping_add(col)
}

/// Fill `buf` with `sine(a) + sine(b)`, stepping both phases per entry.
#[inline]
fn fill_sine_sum(buf: &mut [u8], mut a: u8, mut b: u8, steps: [u8; 2]) {
    for value in buf.iter_mut() {
        *value = sine(a).wrapping_add(sine(b));
        a = a.wrapping_add(steps[0]);
        b = b.wrapping_add(steps[1]);
    }
}

/// Plasma state for a `ROWS` x `COLS` text grid
#[derive(Debug, Clone)]
pub struct Plasma<const ROWS: usize, const COLS: usize> {
    rows: [u8; ROWS],
    cols: [u8; COLS],
    phases: Phases,
    layout: VideoLayout,
}

/// Plasma sized for the full display profile
pub type ScreenPlasma = Plasma<SCREEN_ROWS, SCREEN_COLS>;

impl<const ROWS: usize, const COLS: usize> Default for Plasma<ROWS, COLS> {
    fn default() -> Self {
        Self::new(VideoLayout::packed(COLS))
    }
}

impl<const ROWS: usize, const COLS: usize> Plasma<ROWS, COLS> {
    /// Zeroed phases and buffers, streaming to `layout`
    pub fn new(layout: VideoLayout) -> Self {
        Self::with_phases(layout, Phases::default())
    }

    pub fn with_phases(layout: VideoLayout, phases: Phases) -> Self {
        Self {
            rows: [0; ROWS],
            cols: [0; COLS],
            phases,
            layout,
        }
    }

    pub fn phases(&self) -> Phases {
        self.phases
    }

    pub fn layout(&self) -> VideoLayout {
        self.layout
    }

    pub fn row_buffer(&self) -> &[u8; ROWS] {
        &self.rows
    }

    pub fn col_buffer(&self) -> &[u8; COLS] {
        &self.cols
    }

    /// Glyph index of a cell from the current buffers
    ///
    /// # Panics
    /// If `row >= ROWS` or `col >= COLS`.
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> u8 {
        cell_value(self.rows[row], self.cols[col])
    }

    /// Current frame as a grid of glyph indices
    pub fn frame(&self) -> [[u8; COLS]; ROWS] {
        let mut grid = [[0u8; COLS]; ROWS];
        for (line, &y) in grid.iter_mut().zip(self.rows.iter()) {
            for (cell, &x) in line.iter_mut().zip(self.cols.iter()) {
                *cell = cell_value(y, x);
            }
        }
        grid
    }

    /// Rebuild both buffers from the stored phases, then step the phases.
    pub fn advance(&mut self) {
        let p = self.phases;
        fill_sine_sum(&mut self.rows, p.row_a, p.row_b, ROW_STEPS.per_cell);
        fill_sine_sum(&mut self.cols, p.col_a, p.col_b, COL_STEPS.per_cell);
        self.phases.advance();
    }

    /// Write the current buffers to video memory, row-major.
    ///
    /// Only glyph bytes are written. The cursor steps by `CELL_STRIDE` so the
    /// attribute byte of each cell is left as it was.
    pub fn stream<S: VideoSink + ?Sized>(&self, sink: &mut S) {
        sink.set_stride(CELL_STRIDE);
        for (r, &y) in self.rows.iter().enumerate() {
            sink.set_cursor(self.layout.row_address(r));
            for &x in self.cols.iter() {
                sink.write_data(cell_value(y, x));
            }
        }
    }

    /// One animation frame: rebuild, step, then stream.
    pub fn update<S: VideoSink + ?Sized>(&mut self, sink: &mut S) {
        self.advance();
        self.stream(sink);
    }
}
