/// Presentation layer: double-buffered, diff-based terminal surface.
///
/// Three cell grids:
///   - `base`    — the portfolio page, recomposed from scratch every frame
///   - `overlay` — the rain canvas; persistent across frames so the
///                 low-alpha fades accumulate into trails
///   - `screen`  — what the terminal currently shows
///
/// `present()` merges base + overlay, compares against `screen`, and only
/// emits terminal commands for cells that changed, batched with `queue!`
/// and flushed once. This eliminates flicker from full-screen redraws.
///
/// Every glyph in the crate is one terminal column wide (the rain alphabet
/// uses halfwidth katakana), so a cell is a plain `char` with no wide-cell
/// bookkeeping.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::surface::{Rgb, Surface};

/// How close a fading glyph must get to the background before its cell is
/// dropped from the overlay entirely.
const FADE_FLOOR: u8 = 6;

/// Glow accent: how far a fresh rain glyph is lifted toward white.
const GLOW_LIFT: f32 = 0.35;

// ── Cell ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

impl Cell {
    /// Sentinel used to invalidate the screen buffer: different from any
    /// real cell, so every position gets diff'd on the next present.
    const INVALID: Cell = Cell {
        ch: '\u{0}',
        fg: Rgb::new(255, 0, 255),
        bg: Rgb::new(255, 0, 255),
    };

    fn blank(bg: Rgb) -> Cell {
        Cell { ch: ' ', fg: Rgb::WHITE, bg }
    }

    fn is_blank(&self) -> bool {
        self.ch == ' '
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize, blank: Cell) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![blank; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize, blank: Cell) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![blank; w * h];
        }
    }

    fn clear(&mut self, blank: Cell) {
        self.cells.fill(blank);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::INVALID
        }
    }
}

// ── TermSurface ──

pub struct TermSurface {
    writer: BufWriter<io::Stdout>,
    base: FrameBuffer,
    overlay: FrameBuffer,
    screen: FrameBuffer,
    term_w: u16,
    term_h: u16,
    background: Rgb,
}

impl TermSurface {
    pub fn new(background: Rgb) -> Self {
        let blank = Cell::blank(background);
        TermSurface {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            base: FrameBuffer::new(0, 0, blank),
            overlay: FrameBuffer::new(0, 0, blank),
            screen: FrameBuffer::new(0, 0, blank),
            term_w: 0,
            term_h: 0,
            background,
        }
    }

    /// Claim the terminal. Failing here is fatal for the whole program;
    /// there is nothing to do without a drawable surface.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(term_color(self.background)),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.apply_size(tw, th);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Terminal was resized: re-size all grids and force a full repaint.
    /// The rain overlay is rebuilt by the effect's own regrid.
    pub fn resize(&mut self, w: u16, h: u16) {
        self.apply_size(w, h);
        let _ = queue!(
            self.writer,
            SetBackgroundColor(term_color(self.background)),
            Clear(ClearType::All)
        );
    }

    fn apply_size(&mut self, w: u16, h: u16) {
        self.term_w = w;
        self.term_h = h;
        let blank = Cell::blank(self.background);
        self.base.resize(w as usize, h as usize, blank);
        self.overlay.resize(w as usize, h as usize, blank);
        self.screen.resize(w as usize, h as usize, blank);
        // Force full repaint: screen ≠ merged for every cell.
        self.screen.clear(Cell::INVALID);
    }

    pub fn width(&self) -> u16 {
        self.term_w
    }

    pub fn height(&self) -> u16 {
        self.term_h
    }

    // ── Page composition (base buffer) ──

    pub fn base_clear(&mut self) {
        let blank = Cell::blank(self.background);
        self.base.clear(blank);
    }

    /// Paint a full row of background (title/status bars).
    pub fn fill_row(&mut self, y: u16, bg: Rgb) {
        for x in 0..self.base.width {
            self.base.set(x, y as usize, Cell { ch: ' ', fg: Rgb::WHITE, bg });
        }
    }

    /// Write a string into the base buffer. Each char occupies one column;
    /// text past the right edge is dropped.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, fg: Rgb, bg: Rgb) {
        let mut cx = x as usize;
        for ch in s.chars() {
            if cx >= self.base.width {
                break;
            }
            self.base.set(cx, y as usize, Cell { ch, fg, bg });
            cx += 1;
        }
    }

    // ── Diff flush: only write changed cells ──

    pub fn present(&mut self) -> io::Result<()> {
        let mut last_fg = Rgb::WHITE;
        let mut last_bg = self.background;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit colors at frame start — ResetColor would fall back to
        // the terminal's own default and cause artifacts.
        queue!(
            self.writer,
            SetForegroundColor(term_color(last_fg)),
            SetBackgroundColor(term_color(last_bg)),
        )?;

        for y in 0..self.base.height {
            for x in 0..self.base.width {
                let over = self.overlay.get(x, y);
                let cell = if over.is_blank() { self.base.get(x, y) } else { over };
                let prev = self.screen.get(x, y);

                if cell == prev {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(term_color(cell.fg)))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(term_color(cell.bg)))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;

                self.screen.set(x, y, cell);
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ── Surface: the rain effect's drawing contract ──

impl Surface for TermSurface {
    fn size(&self) -> (u16, u16) {
        (self.term_w, self.term_h)
    }

    fn fill(&mut self, color: Rgb, alpha: f32) {
        let blank = Cell::blank(self.background);
        if alpha >= 1.0 {
            // Hard clear: the canvas goes fully transparent and the page
            // shows through again.
            self.overlay.clear(blank);
            return;
        }
        for cell in self.overlay.cells.iter_mut() {
            if cell.is_blank() {
                continue;
            }
            cell.fg = cell.fg.blend(color, alpha);
            if cell.fg.near(color, FADE_FLOOR) {
                *cell = blank;
            }
        }
    }

    fn draw_glyph(&mut self, col: i32, row: i32, ch: char, color: Rgb, glow: bool) {
        if col < 0 || row < 0 {
            return;
        }
        let fg = if glow { color.lift(GLOW_LIFT) } else { color };
        let cell = Cell { ch, fg, bg: self.background };
        self.overlay.set(col as usize, row as usize, cell);
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}
