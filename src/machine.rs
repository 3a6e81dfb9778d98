//! Emulated target: font memory, video memory and the plasma driving them
//!
//! Boot runs the charset generator once and installs it, then every call to
//! `frame` is one iteration of the endless update loop.

use crate::consts::{CHARSET_ADDRESS, SCREEN_COLS, SCREEN_ROWS};
use crate::effect::{Charset, ScreenPlasma, Xorshift32, generate_charset};
use crate::settings::Settings;
use crate::video::{FontMemory, FontRam, VideoLayout, Vram};

pub struct Machine {
    pub font: FontRam,
    pub vram: Vram,
    pub plasma: ScreenPlasma,
    charset: Charset,
    frames: u64,
}

impl Machine {
    /// Generate and install the charset, color the text map, zero the phases.
    pub fn boot(settings: &Settings) -> Self {
        let layout = VideoLayout::TEXT_MAP;
        let mut font = FontRam::new();
        let mut rng = Xorshift32::new(settings.effective_seed());

        let charset = generate_charset(&mut font, CHARSET_ADDRESS, &mut rng);
        font.install_charset(CHARSET_ADDRESS);
        log::info!(
            "Charset installed at {:#06x} ({} lit pixels)",
            CHARSET_ADDRESS,
            charset.glyphs().iter().map(|g| g.population()).sum::<u32>()
        );

        let mut vram = Vram::new();
        vram.fill_attributes(layout, SCREEN_ROWS, SCREEN_COLS, settings.color_attribute);

        Self {
            font,
            vram,
            plasma: ScreenPlasma::new(layout),
            charset,
            frames: 0,
        }
    }

    /// Advance one animation frame and stream it to video memory
    pub fn frame(&mut self) {
        self.plasma.update(&mut self.vram);
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    pub fn layout(&self) -> VideoLayout {
        self.plasma.layout()
    }
}
