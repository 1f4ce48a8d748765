use crate::keyboard_macros::MacroSequence;

/// Config for the menu button gesture
#[derive(Clone, Debug)]
pub struct GestureConfig {
    /// Number of menu presses which make up the gesture
    pub presses: u8,
    /// Keys sent when the gesture completes and the macro is armed
    pub sequence: MacroSequence,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            presses: 3,
            sequence: MacroSequence::sos(),
        }
    }
}
