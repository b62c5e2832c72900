/// The falling-character effect.
///
/// One drop row per column; every frame fades the whole surface slightly
/// and draws a fresh random glyph per column, producing trails without a
/// hard clear. Columns restart probabilistically after leaving the bottom
/// edge so the streams stay staggered.

use crate::domain::surface::{Rgb, Surface};

/// Glyph alphabet: Latin alphanumerics, the halfwidth katakana block
/// (single terminal column, unlike their fullwidth siblings), punctuation.
const GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789\
ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜｦﾝ\
!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Tunable aesthetics (see `[rain]` in config.toml). The jittered spawn
/// offsets and the probabilistic column restarts are intentional: without
/// them every stream enters and wraps in lockstep.
#[derive(Clone, Debug)]
pub struct RainParams {
    /// Cells per grid column (the original's font size in pixels).
    pub glyph_size: u16,
    /// Fresh drops start at a row in `[-spawn_depth, 0)`.
    pub spawn_depth: i32,
    /// Chance per frame that a drop past the bottom edge restarts at 0.
    pub reset_chance: f32,
    /// Per-frame fade toward the background.
    pub trail_alpha: f32,
    pub color: Rgb,
    pub background: Rgb,
}

impl Default for RainParams {
    fn default() -> Self {
        RainParams {
            glyph_size: 1,
            spawn_depth: 100,
            reset_chance: 0.025,
            trail_alpha: 0.04,
            color: Rgb::new(0, 255, 65),
            background: Rgb::new(3, 6, 4),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RainState {
    Idle,
    Running,
}

pub struct RainEffect {
    params: RainParams,
    glyphs: Vec<char>,
    state: RainState,
    width: u16,
    height: u16,
    drops: Vec<i32>,
}

impl RainEffect {
    pub fn new(params: RainParams, width: u16, height: u16) -> Self {
        let mut fx = RainEffect {
            glyphs: GLYPHS.chars().collect(),
            params,
            state: RainState::Idle,
            width,
            height,
            drops: Vec::new(),
        };
        fx.respawn_columns();
        fx
    }

    pub fn is_running(&self) -> bool {
        self.state == RainState::Running
    }

    #[allow(dead_code)]
    pub fn state(&self) -> RainState {
        self.state
    }

    #[allow(dead_code)]
    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    #[allow(dead_code)]
    pub fn drops(&self) -> &[i32] {
        &self.drops
    }

    /// Begin the frame cycle with a fresh grid. No-op while already
    /// running, so a repeated start can never stack a second frame chain.
    pub fn start(&mut self) {
        if self.state == RainState::Running {
            return;
        }
        self.respawn_columns();
        self.state = RainState::Running;
    }

    /// Halt the frame cycle. The last frame stays on the surface; the
    /// session schedules `clear()` shortly after so the trail lingers.
    pub fn stop(&mut self) {
        self.state = RainState::Idle;
    }

    /// The deferred hard clear. Fires through the timer queue even though
    /// the effect is already idle by then.
    pub fn clear(&self, surface: &mut dyn Surface) {
        surface.fill(self.params.background, 1.0);
    }

    /// New surface dimensions: re-derive the column count and respawn the
    /// grid, whether or not the effect is currently running.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.respawn_columns();
    }

    /// Draw one frame. Does nothing unless running; this check is what
    /// cancels the frame chain after `stop()`.
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        if self.state != RainState::Running {
            return;
        }

        surface.fill(self.params.background, self.params.trail_alpha);

        let size = self.params.glyph_size.max(1) as i32;
        let height = self.height as i32;
        for i in 0..self.drops.len() {
            let ch = self.glyphs[fastrand::usize(..self.glyphs.len())];
            let x = i as i32 * size;
            let y = self.drops[i] * size;
            surface.draw_glyph(x, y, ch, self.params.color, true);

            // Past the bottom edge: restart at the top, but only sometimes.
            if y > height && fastrand::f32() < self.params.reset_chance {
                self.drops[i] = 0;
            }
            self.drops[i] += 1;
        }
    }

    fn respawn_columns(&mut self) {
        let size = self.params.glyph_size.max(1);
        let cols = (self.width / size) as usize;
        let depth = self.params.spawn_depth.max(1);
        self.drops = (0..cols).map(|_| fastrand::i32(-depth..0)).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counting stub: records draw traffic instead of painting.
    struct StubSurface {
        fades: usize,
        hard_clears: usize,
        glyphs: usize,
    }

    impl StubSurface {
        fn new() -> Self {
            StubSurface { fades: 0, hard_clears: 0, glyphs: 0 }
        }
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
        fn draw_glyph(&mut self, _col: i32, _row: i32, _ch: char, _color: Rgb, _glow: bool) {
            self.glyphs += 1;
        }
    }

    fn effect() -> RainEffect {
        RainEffect::new(RainParams::default(), 80, 24)
    }

    #[test]
    fn columns_follow_width() {
        let mut fx = effect();
        assert_eq!(fx.columns(), 80);

        fx.resize(40, 24);
        assert_eq!(fx.columns(), 40);

        // Column count floors: 81 cells at glyph size 2 → 40 columns.
        let params = RainParams { glyph_size: 2, ..RainParams::default() };
        let fx = RainEffect::new(params, 81, 24);
        assert_eq!(fx.columns(), 40);
    }

    #[test]
    fn fresh_grids_start_above_the_surface() {
        let fx = effect();
        assert!(fx.drops().iter().all(|&d| (-100..0).contains(&d)));

        // Resize re-randomizes every entry back into the negative range.
        let mut fx = effect();
        for _ in 0..300 {
            let mut stub = StubSurface::new();
            fx.start();
            fx.frame(&mut stub);
        }
        fx.resize(60, 24);
        assert!(fx.drops().iter().all(|&d| (-100..0).contains(&d)));
    }

    #[test]
    fn start_is_noop_while_running() {
        let mut fx = effect();
        fx.start();
        let before = fx.drops().to_vec();
        fx.start();
        // A second start must not respawn the grid.
        assert_eq!(fx.drops(), &before[..]);
    }

    #[test]
    fn drops_advance_once_per_frame() {
        let mut fx = effect();
        fx.start();
        let before = fx.drops().to_vec();
        let mut stub = StubSurface::new();
        fx.frame(&mut stub);
        // Fresh drops are all far above the bottom edge, so none can have
        // reset: every column advanced by exactly one row.
        for (old, new) in before.iter().zip(fx.drops()) {
            assert_eq!(*new, old + 1);
        }
        assert_eq!(stub.fades, 1);
        assert_eq!(stub.glyphs, fx.columns());
    }

    #[test]
    fn stop_halts_frames_but_not_the_deferred_clear() {
        let mut fx = effect();
        let mut stub = StubSurface::new();

        fx.start();
        fx.frame(&mut stub);
        fx.frame(&mut stub);
        assert_eq!(stub.fades, 2);

        fx.stop();
        fx.frame(&mut stub);
        fx.frame(&mut stub);
        // No frame ran after stop.
        assert_eq!(stub.fades, 2);
        assert_eq!(stub.hard_clears, 0);

        // The clear still lands once its timer fires.
        fx.clear(&mut stub);
        assert_eq!(stub.hard_clears, 1);
    }

    #[test]
    fn certain_reset_keeps_drops_bounded() {
        let params = RainParams { reset_chance: 1.0, ..RainParams::default() };
        let mut fx = RainEffect::new(params, 20, 10);
        let mut stub = StubSurface::new();
        fx.start();
        for _ in 0..500 {
            fx.frame(&mut stub);
        }
        // With guaranteed restarts, no drop can run much past the edge.
        assert!(fx.drops().iter().all(|&d| d <= 12));
    }

    #[test]
    fn zero_reset_chance_never_restarts() {
        let params = RainParams { reset_chance: 0.0, ..RainParams::default() };
        let mut fx = RainEffect::new(params, 20, 10);
        let mut stub = StubSurface::new();
        fx.start();
        for _ in 0..500 {
            fx.frame(&mut stub);
        }
        assert!(fx.drops().iter().all(|&d| d > 10));
    }
}
