/// Portfolio page composition: everything that is not the rain.
///
/// Rebuilt into the base buffer every frame:
///   row 0        title bar with window-control dots and a centered title
///   row 2..      shell-style body, then the staged boot messages
///   last row     status/help line
/// The unlock message is a centered overlay drawn last, above the body.

use crate::domain::surface::Rgb;
use crate::sim::session::Session;

use super::term::TermSurface;

/// Shared page/rain background. The rain's deferred clear paints this
/// exact color, so the two layers always agree.
pub const BG: Rgb = Rgb::new(3, 6, 4);

// Window-control dots keep their classic colors in both phosphor modes.
const CONTROL_CLOSE: Rgb = Rgb::new(255, 95, 86);
const CONTROL_MIN: Rgb = Rgb::new(255, 189, 46);
const CONTROL_MAX: Rgb = Rgb::new(39, 201, 63);

/// Phosphor palettes; F3 swaps between them (the original's retro-mode
/// body-class toggle).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phosphor {
    Green,
    Amber,
}

impl Phosphor {
    pub fn toggled(self) -> Self {
        match self {
            Phosphor::Green => Phosphor::Amber,
            Phosphor::Amber => Phosphor::Green,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Theme {
    pub fg: Rgb,
    pub dim: Rgb,
    pub accent: Rgb,
    pub bar_bg: Rgb,
    pub bar_fg: Rgb,
    pub message: Rgb,
}

impl Theme {
    pub fn phosphor(p: Phosphor) -> Theme {
        match p {
            Phosphor::Green => Theme {
                fg: Rgb::new(0, 255, 65),
                dim: Rgb::new(0, 150, 60),
                accent: Rgb::new(0, 255, 255),
                bar_bg: Rgb::new(14, 30, 18),
                bar_fg: Rgb::new(190, 255, 200),
                message: Rgb::new(255, 0, 128),
            },
            Phosphor::Amber => Theme {
                fg: Rgb::new(255, 176, 0),
                dim: Rgb::new(165, 110, 0),
                accent: Rgb::new(255, 224, 130),
                bar_bg: Rgb::new(38, 26, 6),
                bar_fg: Rgb::new(255, 236, 190),
                message: Rgb::new(255, 0, 128),
            },
        }
    }

    /// Brightness-lifted copy for the CRT flicker frames.
    fn lifted(self) -> Theme {
        Theme {
            fg: self.fg.lift(0.18),
            dim: self.dim.lift(0.18),
            accent: self.accent.lift(0.18),
            bar_bg: self.bar_bg,
            bar_fg: self.bar_fg.lift(0.18),
            message: self.message.lift(0.18),
        }
    }
}

// ── Page content ──

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tone {
    Prompt,
    Output,
    Accent,
    Blank,
}

const TITLE: &str = " jym@portfolio: ~ ";

const BODY: &[(Tone, &str)] = &[
    (Tone::Prompt, "visitor@jym:~$ cat about.txt"),
    (Tone::Output, "  Jym :: systems tinkerer, retro computing enthusiast."),
    (Tone::Output, "  Day job: keeping old machines honest."),
    (Tone::Blank, ""),
    (Tone::Prompt, "visitor@jym:~$ ls skills/"),
    (Tone::Output, "  rust/  c/  shell/  soldering/  crt-restoration/"),
    (Tone::Blank, ""),
    (Tone::Prompt, "visitor@jym:~$ cat .hint"),
    (Tone::Output, "  Hidden features await those who remember the classics..."),
    (Tone::Accent, "  \u{2191} \u{2191} \u{2193} \u{2193} \u{2190} \u{2192} \u{2190} \u{2192} B A"),
];

/// Boot messages reveal one by one, matching the original's staged
/// console logs at roughly 2 s / 3 s / 4 s (in 75 ms page ticks).
const BOOT: &[(u32, &str)] = &[
    (27, "[SYSTEM] Matrix protocols loaded..."),
    (40, "[SYSTEM] CRT effects initialized..."),
    (53, "[SYSTEM] All systems operational."),
];

const MESSAGE: &str = "Hello there.";

const BODY_ROW: u16 = 2;
const MARGIN: u16 = 2;

// ── Composition ──

pub fn compose(surface: &mut TermSurface, session: &Session, theme: &Theme) {
    let w = surface.width();
    let h = surface.height();
    if w == 0 || h == 0 {
        return;
    }

    let t = if session.flicker_on { theme.lifted() } else { *theme };

    surface.base_clear();
    compose_title_bar(surface, &t, w);
    compose_body(surface, session, &t);
    compose_status(surface, session, &t, h);

    if session.message_visible {
        compose_message(surface, &t, w, h);
    }
}

fn compose_title_bar(surface: &mut TermSurface, t: &Theme, w: u16) {
    surface.fill_row(0, t.bar_bg);
    surface.put_str(1, 0, "\u{25cf}", CONTROL_CLOSE, t.bar_bg);
    surface.put_str(3, 0, "\u{25cf}", CONTROL_MIN, t.bar_bg);
    surface.put_str(5, 0, "\u{25cf}", CONTROL_MAX, t.bar_bg);

    let tx = center_x(w, TITLE.chars().count());
    surface.put_str(tx, 0, TITLE, t.bar_fg, t.bar_bg);
}

fn compose_body(surface: &mut TermSurface, session: &Session, t: &Theme) {
    let mut y = BODY_ROW;
    for (tone, line) in BODY {
        let fg = match tone {
            Tone::Prompt => t.fg,
            Tone::Output => t.dim,
            Tone::Accent => t.accent,
            Tone::Blank => t.dim,
        };
        surface.put_str(MARGIN, y, line, fg, BG);
        y += 1;
    }

    // Staged boot messages below the body.
    y += 1;
    for (tick, line) in BOOT {
        if session.anim_tick >= *tick {
            surface.put_str(MARGIN, y, line, t.dim, BG);
            y += 1;
        }
    }
}

fn compose_status(surface: &mut TermSurface, session: &Session, t: &Theme, h: u16) {
    let y = h - 1;
    surface.fill_row(y, t.bar_bg);
    surface.put_str(1, y, "[F2] matrix  [F3] phosphor  [Esc] quit", t.bar_fg, t.bar_bg);

    if session.rain.is_running() {
        let tag = "MATRIX ON ";
        let x = surface.width().saturating_sub(tag.len() as u16 + 1);
        surface.put_str(x, y, tag, t.accent, t.bar_bg);
    }
}

/// Centered three-row box around the unlock message.
fn compose_message(surface: &mut TermSurface, t: &Theme, w: u16, h: u16) {
    let inner = MESSAGE.chars().count() + 2;
    let top = format!("\u{256d}{}\u{256e}", "\u{2500}".repeat(inner));
    let mid = format!("\u{2502} {} \u{2502}", MESSAGE);
    let bot = format!("\u{2570}{}\u{256f}", "\u{2500}".repeat(inner));

    let x = center_x(w, inner + 2);
    let y = (h / 2).saturating_sub(1);
    surface.put_str(x, y, &top, t.message, BG);
    surface.put_str(x, y + 1, &mid, t.message, BG);
    surface.put_str(x, y + 2, &bot, t.message, BG);
}

fn center_x(w: u16, len: usize) -> u16 {
    let len = len as u16;
    if len >= w {
        0
    } else {
        (w - len) / 2
    }
}
