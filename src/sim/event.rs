/// Deferred actions scheduled on the one-shot timer queue.
/// The event loop fires these; `sim::session` does the wiring.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Deferred {
    /// Re-arm the sequence detector and stop the rain (end of a cycle).
    ResetDetector,
    /// Hide the transient unlock message.
    HideMessage,
    /// One hard clear of the rain surface after the fade-out grace period.
    ClearRain,
    /// End a CRT brightness flicker.
    FlickerOff,
}
