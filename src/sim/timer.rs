/// One-shot deferred actions.
///
/// There is no async runtime; deferrals are plain (deadline, action) pairs
/// drained once per loop iteration. `Instant`s are injected by the caller
/// so tests run on synthetic clocks. An action fires no earlier than its
/// deadline, in schedule order among those due; precision beyond that is
/// whatever the loop's sleep grain allows.

use std::time::{Duration, Instant};

use super::event::Deferred;

struct Pending {
    due: Instant,
    action: Deferred,
}

pub struct TimerQueue {
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new() -> Self {
        TimerQueue { pending: Vec::new() }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, action: Deferred) {
        self.pending.push(Pending { due: now + delay, action });
    }

    /// Remove and return every action whose deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> Vec<Deferred> {
        let mut due = Vec::new();
        self.pending.retain(|p| {
            if p.due <= now {
                due.push(p.action);
                false
            } else {
                true
            }
        });
        due
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
