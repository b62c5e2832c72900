/// Entry point and event loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::EffectsConfig;
use domain::rain::{RainEffect, RainParams};
use domain::sequence::{SequenceDetector, KONAMI};
use domain::surface::Surface;
use sim::session::Session;
use ui::input::InputState;
use ui::page::{self, Phosphor, Theme};
use ui::term::TermSurface;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = EffectsConfig::load();

    let mut surface = TermSurface::new(page::BG);
    if let Err(e) = surface.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let (w, h) = surface.size();
    let params = RainParams {
        glyph_size: config.rain.glyph_size,
        spawn_depth: config.rain.spawn_depth,
        reset_chance: config.rain.reset_chance,
        trail_alpha: config.rain.trail_alpha,
        background: page::BG,
        ..RainParams::default()
    };
    let detector = SequenceDetector::new(&KONAMI);
    let rain = RainEffect::new(params, w, h);
    let mut session = Session::new(detector, rain, &config);

    let result = event_loop(&mut session, &mut surface, &config);

    if let Err(e) = surface.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
}

fn event_loop(
    session: &mut Session,
    surface: &mut TermSurface,
    config: &EffectsConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let tick_rate = Duration::from_millis(config.page.tick_ms);
    let frame_rate = Duration::from_millis(config.rain.frame_ms);
    let mut last_tick = Instant::now();
    let mut last_frame = Instant::now();
    let mut phosphor = Phosphor::Green;

    loop {
        input.drain_events();
        let now = Instant::now();

        if input.ctrl_c_pressed() || input.quit_pressed() {
            break;
        }

        if let Some((w, h)) = input.resized() {
            surface.resize(w, h);
            session.rain.resize(w, h);
        }

        // F2: manual rain toggle.  F3: phosphor palette toggle.
        if input.pressed(KeyCode::F(2)) {
            session.toggle_rain(now);
        }
        if input.pressed(KeyCode::F(3)) {
            phosphor = phosphor.toggled();
        }

        // Every key press feeds the detector, in arrival order.
        for symbol in input.symbols() {
            session.on_symbol(symbol, now);
        }

        session.dispatch_timers(now, surface);

        if last_tick.elapsed() >= tick_rate {
            session.tick_page(now);
            last_tick = now;
        }

        // The rain advances on its own cadence, and only while running;
        // stop() leaves no way for another frame to sneak in.
        if session.rain.is_running() && last_frame.elapsed() >= frame_rate {
            session.rain.frame(surface);
            last_frame = now;
        }

        page::compose(surface, session, &Theme::phosphor(phosphor));
        surface.present()?;

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
