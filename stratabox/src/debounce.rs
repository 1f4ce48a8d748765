use embassy_time::{Duration, Instant};

/// Debounce state
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// A released-to-pressed edge outside the debounce window, emit one press event.
    Debounced,
    /// A released-to-pressed edge that arrived inside the debounce window of the last accepted press.
    InProgress,
    /// No press edge: the level is unchanged, or the button was released.
    Ignored,
}

/// Eager per-button edge debouncer.
///
/// A press is reported on the first released-to-pressed edge, then further press edges of the same
/// button are dropped until `interval` has elapsed since the accepted one. Releases are never events.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeDebouncer {
    /// Level seen on the previous sample
    pressed: bool,
    /// Time of the last accepted press, `None` until the first one
    last_accept: Option<Instant>,
}

impl EdgeDebouncer {
    pub const fn new() -> Self {
        Self {
            pressed: false,
            last_accept: None,
        }
    }

    /// Feed one sample of the button level.
    ///
    /// The stored level always follows `pressed`, so a press dropped by the window doesn't leave the
    /// debouncer believing the button is still released.
    pub fn detect_change_with_debounce(&mut self, pressed: bool, now: Instant, interval: Duration) -> DebounceState {
        let was_pressed = self.pressed;
        self.pressed = pressed;

        if !pressed || was_pressed {
            return DebounceState::Ignored;
        }

        if self
            .last_accept
            .is_some_and(|last| now.saturating_duration_since(last) <= interval)
        {
            return DebounceState::InProgress;
        }

        self.last_accept = Some(now);
        DebounceState::Debounced
    }

    /// Overwrite the stored level without producing an event.
    ///
    /// Used after sampling the boot latch, so a button held through boot isn't reported as a press.
    pub fn sync_level(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    /// Level seen on the last sample
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Time of the last accepted press
    pub fn last_accept(&self) -> Option<Instant> {
        self.last_accept
    }
}
