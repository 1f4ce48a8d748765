use embassy_time::{Duration, Instant};

/// Progress of the repeated-press gesture
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureState {
    /// No press counted
    Idle,
    /// `presses` presses counted, the first one at `window_start`
    Counting { presses: u8, window_start: Instant },
}

/// What a press did to the gesture
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureOutcome {
    /// The press was counted, holds the current count
    Counting(u8),
    /// The gesture completed and the macro is armed: play it
    Triggered,
    /// The gesture completed but the macro isn't armed, nothing to do
    Absorbed,
}

/// Detects `threshold` presses of one button within `window` of the first press.
///
/// It only observes press events: the button's own keystroke is sent regardless of the gesture.
/// A completed gesture always returns the detector to `Idle`, so the same presses never count twice.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GestureDetector {
    state: GestureState,
    threshold: u8,
    window: Duration,
    armed: bool,
}

impl GestureDetector {
    /// Create a disarmed detector
    pub fn new(threshold: u8, window: Duration) -> Self {
        Self {
            state: GestureState::Idle,
            threshold: threshold.max(1),
            window,
            armed: false,
        }
    }

    /// Enable the macro. Armed once at boot, never disarmed.
    pub(crate) fn arm(&mut self) {
        self.armed = true;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Presses counted in the current window
    pub fn press_count(&self) -> u8 {
        match self.state {
            GestureState::Idle => 0,
            GestureState::Counting { presses, .. } => presses,
        }
    }

    /// Feed an accepted press of the gesture button.
    pub fn on_press(&mut self, now: Instant) -> GestureOutcome {
        let (presses, window_start) = match self.state {
            GestureState::Counting { presses, window_start }
                if now.saturating_duration_since(window_start) <= self.window =>
            {
                (presses.saturating_add(1), window_start)
            }
            // Idle, or the window has passed: this press starts a new sequence
            _ => (1, now),
        };

        if presses >= self.threshold {
            self.state = GestureState::Idle;
            if self.armed {
                GestureOutcome::Triggered
            } else {
                GestureOutcome::Absorbed
            }
        } else {
            self.state = GestureState::Counting { presses, window_start };
            GestureOutcome::Counting(presses)
        }
    }
}
