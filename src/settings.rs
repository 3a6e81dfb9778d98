//! Host settings
//!
//! Only the terminal host is configurable. Grid size, addresses and phase
//! steps are compile-time constants in `consts` and `effect::plasma`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::RNG_SEED;

/// How a glyph bitmap is turned into one terminal character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    /// Density ramp picked by lit-pixel count
    #[default]
    Ramp,
    /// 2x4 braille dots sampled from the 8x8 bitmap
    Braille,
}

impl GlyphStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlyphStyle::Ramp => "ramp",
            GlyphStyle::Braille => "braille",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ramp" | "ascii" => Some(GlyphStyle::Ramp),
            "braille" => Some(GlyphStyle::Braille),
            _ => None,
        }
    }
}

/// Terminal host settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frame cap, 0 = uncapped
    pub fps_cap: u32,
    pub glyph_style: GlyphStyle,
    /// Emit terminal colors from cell attributes
    pub color: bool,
    /// Attribute written to every cell at startup (bg << 4 | fg)
    pub color_attribute: u8,
    /// Charset RNG seed, 0 is replaced by the default
    pub seed: u32,
    /// Stop after this many frames
    pub frame_limit: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            glyph_style: GlyphStyle::Ramp,
            color: true,
            // White on blue
            color_attribute: 0x61,
            seed: RNG_SEED,
            frame_limit: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = Self::from_json(&json)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Seed actually handed to the RNG
    pub fn effective_seed(&self) -> u32 {
        if self.seed == 0 {
            log::warn!("Seed 0 is degenerate for xorshift, using {}", RNG_SEED);
            RNG_SEED
        } else {
            self.seed
        }
    }

    /// Minimum time per frame, `None` when uncapped
    pub fn frame_interval(&self) -> Option<Duration> {
        if self.fps_cap == 0 {
            None
        } else {
            Some(Duration::from_secs(1) / self.fps_cap)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.seed, RNG_SEED);
        assert_eq!(s.glyph_style, GlyphStyle::Ramp);
        assert_eq!(s.frame_limit, None);
        assert_eq!(s.frame_interval(), Some(Duration::from_secs(1) / 60));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "glyph_style": "braille", "fps_cap": 0 }"#).unwrap();
        assert_eq!(s.glyph_style, GlyphStyle::Braille);
        assert_eq!(s.frame_interval(), None);
        assert_eq!(s.color_attribute, 0x61);
        assert!(s.color);
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings {
            frame_limit: Some(500),
            seed: 42,
            ..Default::default()
        };
        let json = s.to_json_pretty().unwrap();
        assert!(json.contains("\"glyph_style\": \"ramp\""));
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(Settings::from_json(r#"{ "glyph_style": "sixel" }"#).is_err());
        assert!(Settings::from_json(r#"{ "color_attribute": 300 }"#).is_err());
    }

    #[test]
    fn test_glyph_style_from_str() {
        assert_eq!(GlyphStyle::from_str("Braille"), Some(GlyphStyle::Braille));
        assert_eq!(GlyphStyle::from_str("ASCII"), Some(GlyphStyle::Ramp));
        assert_eq!(GlyphStyle::from_str("blocks"), None);
        assert_eq!(GlyphStyle::from_str(GlyphStyle::Braille.as_str()), Some(GlyphStyle::Braille));
    }

    #[test]
    fn test_zero_seed_replaced() {
        let s = Settings {
            seed: 0,
            ..Default::default()
        };
        assert_eq!(s.effective_seed(), RNG_SEED);
        let s = Settings {
            seed: 99,
            ..Default::default()
        };
        assert_eq!(s.effective_seed(), 99);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("text-plasma-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{ "seed": 1234, "frame_limit": 10 }"#).unwrap();
        let s = Settings::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(s.seed, 1234);
        assert_eq!(s.frame_limit, Some(10));
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = Settings::load(Path::new("/nonexistent/text-plasma.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading settings"));
    }
}
