/// Keystroke-sequence detector for the hidden unlock.
///
/// Keeps a sliding window of the most recent key symbols and compares it
/// against a fixed target sequence. A full match fires the unlock exactly
/// once; the session re-arms the detector via `reset()` after its delay.

use std::collections::VecDeque;

/// The classic code: ↑ ↑ ↓ ↓ ← → ← → B A.
/// Symbols use web-style key names; comparison is case-insensitive.
pub const KONAMI: [&str; 10] = [
    "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown",
    "ArrowLeft", "ArrowRight", "ArrowLeft", "ArrowRight",
    "b", "a",
];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnlockState {
    Armed,
    Triggered,
}

pub struct SequenceDetector {
    target: Vec<String>,
    window: VecDeque<String>,
    state: UnlockState,
}

impl SequenceDetector {
    pub fn new(target: &[&str]) -> Self {
        SequenceDetector {
            target: target.iter().map(|s| s.to_string()).collect(),
            window: VecDeque::with_capacity(target.len() + 1),
            state: UnlockState::Armed,
        }
    }

    /// Feed one key symbol. Returns true exactly when this symbol completes
    /// the target sequence while the detector is armed.
    ///
    /// A partial mismatch keeps the window: the trailing residue may be the
    /// start of a valid run, so clearing here would miss overlapping input.
    /// The window also keeps sliding while `Triggered`: the guard is on
    /// triggering only, not on capture.
    pub fn on_symbol(&mut self, symbol: &str) -> bool {
        self.window.push_back(symbol.to_string());
        if self.window.len() > self.target.len() {
            self.window.pop_front();
        }

        if self.window.len() < self.target.len() || !self.matches() {
            return false;
        }
        if self.state == UnlockState::Triggered {
            return false;
        }
        self.state = UnlockState::Triggered;
        true
    }

    /// Re-arm and clear the window so the next cycle starts clean.
    pub fn reset(&mut self) {
        self.state = UnlockState::Armed;
        self.window.clear();
    }

    #[allow(dead_code)]
    pub fn state(&self) -> UnlockState {
        self.state
    }

    #[allow(dead_code)]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    fn matches(&self) -> bool {
        self.window
            .iter()
            .zip(&self.target)
            .all(|(got, want)| got.eq_ignore_ascii_case(want))
    }
}
