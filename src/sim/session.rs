/// Session: the wiring between detector, rain effect, and page state.
///
/// The original exposed the effect as a window-global so keyboard
/// shortcuts could reach it; here the session owns both components and
/// every hook goes through it explicitly. All scheduling runs on the
/// one-shot timer queue with caller-supplied `Instant`s, so the whole
/// unlock cycle is testable on a synthetic clock.

use std::time::{Duration, Instant};

use crate::config::EffectsConfig;
use crate::domain::rain::RainEffect;
use crate::domain::sequence::SequenceDetector;
use crate::domain::surface::Surface;

use super::event::Deferred;
use super::timer::TimerQueue;

pub struct Session {
    pub detector: SequenceDetector,
    pub rain: RainEffect,
    timers: TimerQueue,

    reset_delay: Duration,
    message_time: Duration,
    clear_delay: Duration,
    flicker_time: Duration,
    flicker_chance: f32,

    /// Unlock message overlay visibility.
    pub message_visible: bool,
    /// CRT flicker accent currently on.
    pub flicker_on: bool,
    /// Page animation tick (boot-line reveal).
    pub anim_tick: u32,
}

impl Session {
    pub fn new(detector: SequenceDetector, rain: RainEffect, cfg: &EffectsConfig) -> Self {
        Session {
            detector,
            rain,
            timers: TimerQueue::new(),
            reset_delay: Duration::from_millis(cfg.egg.reset_delay_ms),
            message_time: Duration::from_millis(cfg.egg.message_ms),
            clear_delay: Duration::from_millis(cfg.rain.clear_delay_ms),
            flicker_time: Duration::from_millis(cfg.page.flicker_ms),
            flicker_chance: cfg.page.flicker_chance,
            message_visible: false,
            flicker_on: false,
            anim_tick: 0,
        }
    }

    /// Feed one key symbol. On unlock: start the rain, show the message,
    /// and schedule the message hide and the automatic detector reset.
    /// Returns true when this symbol unlocked the egg.
    pub fn on_symbol(&mut self, symbol: &str, now: Instant) -> bool {
        if !self.detector.on_symbol(symbol) {
            return false;
        }
        self.rain.start();
        self.message_visible = true;
        self.timers.schedule(now, self.message_time, Deferred::HideMessage);
        self.timers.schedule(now, self.reset_delay, Deferred::ResetDetector);
        true
    }

    /// Manual rain toggle (the original's Ctrl+Shift+M shortcut), going
    /// through the owned handle instead of a global.
    pub fn toggle_rain(&mut self, now: Instant) {
        if self.rain.is_running() {
            self.stop_rain(now);
        } else {
            self.rain.start();
        }
    }

    /// Page animation tick: advance the boot reveal, roll the flicker.
    pub fn tick_page(&mut self, now: Instant) {
        self.anim_tick = self.anim_tick.wrapping_add(1);
        if !self.flicker_on && fastrand::f32() < self.flicker_chance {
            self.flicker_on = true;
            self.timers.schedule(now, self.flicker_time, Deferred::FlickerOff);
        }
    }

    /// Fire due deferred actions against the surface.
    pub fn dispatch_timers(&mut self, now: Instant, surface: &mut dyn Surface) {
        for action in self.timers.fire_due(now) {
            match action {
                Deferred::ResetDetector => {
                    self.detector.reset();
                    self.stop_rain(now);
                }
                Deferred::HideMessage => self.message_visible = false,
                Deferred::ClearRain => self.rain.clear(surface),
                Deferred::FlickerOff => self.flicker_on = false,
            }
        }
    }

    fn stop_rain(&mut self, now: Instant) {
        self.rain.stop();
        self.timers.schedule(now, self.clear_delay, Deferred::ClearRain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffectsConfig;
    use crate::domain::rain::RainParams;
    use crate::domain::sequence::{KONAMI, UnlockState};
    use crate::domain::surface::Rgb;

    struct StubSurface {
        hard_clears: usize,
        fades: usize,
    }

    impl Surface for StubSurface {
        fn size(&self) -> (u16, u16) {
            (80, 24)
        }
        fn fill(&mut self, _color: Rgb, alpha: f32) {
            if alpha >= 1.0 {
                self.hard_clears += 1;
            } else {
                self.fades += 1;
            }
        }
        fn draw_glyph(&mut self, _c: i32, _r: i32, _ch: char, _col: Rgb, _glow: bool) {}
    }

    fn stub() -> StubSurface {
        StubSurface { hard_clears: 0, fades: 0 }
    }

    fn session() -> Session {
        let cfg = EffectsConfig::defaults();
        let detector = SequenceDetector::new(&KONAMI);
        let rain = RainEffect::new(RainParams::default(), 80, 24);
        Session::new(detector, rain, &cfg)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn unlock_cycle_end_to_end() {
        let t0 = Instant::now();
        let mut s = session();
        let mut surf = stub();

        let mut unlocks = 0;
        for key in KONAMI {
            if s.on_symbol(key, t0) {
                unlocks += 1;
            }
        }
        assert_eq!(unlocks, 1);
        assert!(s.rain.is_running());
        assert!(s.message_visible);

        // Message hides at +4 s; the detector is still pending reset.
        s.dispatch_timers(t0 + ms(4100), &mut surf);
        assert!(!s.message_visible);
        assert!(s.rain.is_running());
        assert_eq!(s.detector.state(), UnlockState::Triggered);

        // Reset at +5 s: re-armed, rain stopped, clear not yet fired.
        s.dispatch_timers(t0 + ms(5100), &mut surf);
        assert_eq!(s.detector.state(), UnlockState::Armed);
        assert!(!s.rain.is_running());
        assert_eq!(surf.hard_clears, 0);

        // Deferred clear lands half a second after the stop.
        s.dispatch_timers(t0 + ms(5700), &mut surf);
        assert_eq!(surf.hard_clears, 1);

        // The cycle re-arms completely: a second run unlocks again.
        let t1 = t0 + ms(6000);
        let mut unlocks = 0;
        for key in KONAMI {
            if s.on_symbol(key, t1) {
                unlocks += 1;
            }
        }
        assert_eq!(unlocks, 1);
    }

    #[test]
    fn repeat_sequence_before_reset_is_ignored() {
        let t0 = Instant::now();
        let mut s = session();

        let first: usize = KONAMI.iter().filter(|k| s.on_symbol(k, t0)).count();
        let second: usize = KONAMI.iter().filter(|k| s.on_symbol(k, t0)).count();
        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert!(s.rain.is_running());
    }

    #[test]
    fn manual_toggle_starts_and_stops() {
        let t0 = Instant::now();
        let mut s = session();
        let mut surf = stub();

        s.toggle_rain(t0);
        assert!(s.rain.is_running());

        s.toggle_rain(t0);
        assert!(!s.rain.is_running());

        // The stop path schedules the same deferred clear.
        s.dispatch_timers(t0 + ms(600), &mut surf);
        assert_eq!(surf.hard_clears, 1);
    }

    #[test]
    fn flicker_turns_itself_off() {
        let t0 = Instant::now();
        let cfg = EffectsConfig::defaults();
        let detector = SequenceDetector::new(&KONAMI);
        let rain = RainEffect::new(RainParams::default(), 80, 24);
        let mut s = Session::new(detector, rain, &cfg);
        s.flicker_chance = 1.0;
        let mut surf = stub();

        s.tick_page(t0);
        assert!(s.flicker_on);
        s.dispatch_timers(t0 + ms(60), &mut surf);
        assert!(!s.flicker_on);
    }
}
