//! Deterministic effect core
//!
//! Everything that decides what ends up on screen lives here. This module must
//! stay pure and deterministic:
//! - Integer arithmetic only, wrapping modulo 256 where noted
//! - Seeded RNG only
//! - Fixed-size buffers, no allocation per frame
//! - No logging or platform dependencies beyond the `video` traits

pub mod charset;
pub mod plasma;
pub mod rng;
pub mod sine;

pub use charset::{Charset, Glyph, generate_charset};
pub use plasma::{COL_STEPS, PhaseSteps, Phases, Plasma, ROW_STEPS, ScreenPlasma, cell_value};
pub use rng::Xorshift32;
pub use sine::{SINE_TABLE, sine};
