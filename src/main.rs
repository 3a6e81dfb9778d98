//! Text Plasma entry point
//!
//! Boots the emulated machine and runs the frame loop, either drawn to the
//! terminal or headless for timing.

use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use text_plasma::consts::{SCREEN_COLS, SCREEN_ROWS};
use text_plasma::video::TerminalDisplay;
use text_plasma::{GlyphStyle, Machine, Settings};

/// Frames run in headless mode when no limit is given
const HEADLESS_FRAMES: u64 = 1000;

#[derive(Parser, Debug)]
#[command(name = "text-plasma", version, about = "Sine plasma on an emulated 80x60 text screen")]
struct Args {
    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// Frame cap (0 = uncapped)
    #[arg(long)]
    fps: Option<u32>,
    /// Glyph rendering: ramp or braille
    #[arg(long, value_parser = parse_style)]
    style: Option<GlyphStyle>,
    /// Disable terminal colors
    #[arg(long)]
    no_color: bool,
    /// Charset RNG seed
    #[arg(long)]
    seed: Option<u32>,
    /// Stop after N frames
    #[arg(long)]
    frames: Option<u64>,
    /// Run without a terminal and report frame rate
    #[arg(long)]
    headless: bool,
    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_settings: bool,
}

fn parse_style(s: &str) -> Result<GlyphStyle, String> {
    GlyphStyle::from_str(s).ok_or_else(|| format!("unknown glyph style '{s}' (expected ramp or braille)"))
}

impl Args {
    /// Settings file (or defaults) with command-line overrides applied
    fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(fps) = self.fps {
            settings.fps_cap = fps;
        }
        if let Some(style) = self.style {
            settings.glyph_style = style;
        }
        if self.no_color {
            settings.color = false;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(frames) = self.frames {
            settings.frame_limit = Some(frames);
        }
        Ok(settings)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = args.resolve()?;

    if args.print_settings {
        println!("{}", settings.to_json_pretty()?);
        return Ok(());
    }

    log::info!(
        "Text Plasma starting: {}x{} grid, style {}, seed {}, fps cap {}",
        SCREEN_COLS,
        SCREEN_ROWS,
        settings.glyph_style.as_str(),
        settings.seed,
        settings.fps_cap
    );

    let mut machine = Machine::boot(&settings);

    if args.headless {
        run_headless(&mut machine, settings.frame_limit.unwrap_or(HEADLESS_FRAMES));
        Ok(())
    } else {
        run_terminal(&mut machine, &settings)
    }
}

fn run_headless(machine: &mut Machine, frames: u64) {
    let start = Instant::now();
    for _ in 0..frames {
        machine.frame();
    }
    let elapsed = start.elapsed();
    let fps = u128::from(machine.frames()) * 1000 / elapsed.as_millis().max(1);
    log::debug!("Final phases: {:?}", machine.plasma.phases());
    println!("{} frames in {:.3?} ({} fps)", machine.frames(), elapsed, fps);
}

fn run_terminal(machine: &mut Machine, settings: &Settings) -> Result<()> {
    let mut display =
        TerminalDisplay::begin(SCREEN_ROWS, SCREEN_COLS, settings.glyph_style, settings.color)?;

    let res = frame_loop(machine, &mut display, settings);

    // Always restore the terminal, report the loop error first
    let restored = display.end();
    res?;
    restored?;

    log::info!("Stopped after {} frames", machine.frames());
    Ok(())
}

fn frame_loop(machine: &mut Machine, display: &mut TerminalDisplay, settings: &Settings) -> Result<()> {
    let interval = settings.frame_interval();

    loop {
        if settings.frame_limit.is_some_and(|limit| machine.frames() >= limit) {
            return Ok(());
        }
        let frame_start = Instant::now();

        if display.poll_quit()? {
            return Ok(());
        }
        display.resize_if_needed()?;

        machine.frame();
        display.present(&machine.vram, &machine.font, machine.layout())?;

        if let Some(interval) = interval {
            let spent = frame_start.elapsed();
            if spent < interval {
                thread::sleep(interval - spent);
            }
        }
    }
}
