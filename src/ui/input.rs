/// Terminal event drain.
///
/// Collects everything crossterm has pending once per loop iteration:
/// key presses become web-style key symbols for the sequence detector
/// (repeats included; holding a key feeds the window just like repeated
/// keydown events did in the original), resize notifications are kept
/// separately, and the meta keys (quit, toggles) are exposed as queries.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Key symbols observed this frame, in arrival order.
    symbols: Vec<String>,
    /// Raw key events this frame, for meta-key handling.
    raw_events: Vec<KeyEvent>,
    /// Most recent resize notification this frame, if any.
    resized: Option<(u16, u16)>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            symbols: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            resized: None,
        }
    }

    /// Drain all pending terminal events. Call once per loop iteration.
    pub fn drain_events(&mut self) {
        self.symbols.clear();
        self.raw_events.clear();
        self.resized = None;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    self.raw_events.push(key);
                    if let Some(sym) = key_symbol(key.code) {
                        self.symbols.push(sym);
                    }
                }
                Ok(Event::Resize(w, h)) => self.resized = Some((w, h)),
                _ => {}
            }
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn resized(&self) -> Option<(u16, u16)> {
        self.resized
    }

    /// Was this key freshly pressed this frame? Edge trigger: repeats
    /// don't count, so holding F2 can't re-toggle every frame.
    pub fn pressed(&self, code: KeyCode) -> bool {
        self.raw_events
            .iter()
            .any(|k| k.code == code && k.kind == KeyEventKind::Press)
    }

    pub fn quit_pressed(&self) -> bool {
        self.pressed(KeyCode::Esc)
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

/// Map a crossterm key to the web-style symbol vocabulary the detector's
/// target sequence uses (`KeyboardEvent.key` names).
fn key_symbol(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Up => Some("ArrowUp".into()),
        KeyCode::Down => Some("ArrowDown".into()),
        KeyCode::Left => Some("ArrowLeft".into()),
        KeyCode::Right => Some("ArrowRight".into()),
        KeyCode::Enter => Some("Enter".into()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_keys_map_to_web_names() {
        assert_eq!(key_symbol(KeyCode::Up).as_deref(), Some("ArrowUp"));
        assert_eq!(key_symbol(KeyCode::Down).as_deref(), Some("ArrowDown"));
        assert_eq!(key_symbol(KeyCode::Left).as_deref(), Some("ArrowLeft"));
        assert_eq!(key_symbol(KeyCode::Right).as_deref(), Some("ArrowRight"));
    }

    #[test]
    fn letters_keep_their_case() {
        // The detector compares case-insensitively; the drain just
        // reports what was typed.
        assert_eq!(key_symbol(KeyCode::Char('b')).as_deref(), Some("b"));
        assert_eq!(key_symbol(KeyCode::Char('B')).as_deref(), Some("B"));
    }

    #[test]
    fn function_keys_are_not_symbols() {
        assert_eq!(key_symbol(KeyCode::F(2)), None);
        assert_eq!(key_symbol(KeyCode::Esc), None);
    }
}
