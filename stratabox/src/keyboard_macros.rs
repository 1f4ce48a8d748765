use heapless::Vec;

use crate::clock::Clock;
use crate::config::{ConfigError, TimingConfig};
use crate::hid::{HidError, KeyEmitter, tap_key};
use crate::keycode::KeyCode;

/// Maximal number of keys in a macro sequence
pub const MACRO_MAX_KEYS: usize = 16;

/// The SOS stratagem: up, down, right, left, up
const SOS_KEYS: [KeyCode; 5] = [KeyCode::Up, KeyCode::Down, KeyCode::Right, KeyCode::Left, KeyCode::Up];

/// An ordered list of keys, tapped one after another when played.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacroSequence {
    keys: Vec<KeyCode, MACRO_MAX_KEYS>,
}

impl MacroSequence {
    pub fn new(keys: &[KeyCode]) -> Result<Self, ConfigError> {
        let keys = Vec::from_slice(keys).map_err(|_| ConfigError::MacroTooLong)?;
        Ok(Self { keys })
    }

    /// The SOS stratagem input
    pub fn sos() -> Self {
        Self {
            keys: SOS_KEYS.into_iter().collect(),
        }
    }

    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Play `sequence` to completion.
///
/// Waits `macro_lead_in` first, then taps every key for `hold_delay` followed by `inter_key_delay`.
/// Nothing else runs on the controller in the meantime and playback can't be cancelled; the first
/// emission error aborts the macro and is returned.
pub async fn play_macro<E: KeyEmitter, C: Clock>(
    sequence: &MacroSequence,
    emitter: &mut E,
    clock: &mut C,
    timing: &TimingConfig,
) -> Result<(), HidError> {
    clock.sleep(timing.macro_lead_in).await;
    for key in sequence.keys() {
        tap_key(emitter, clock, *key, timing.hold_delay).await?;
        clock.sleep(timing.inter_key_delay).await;
    }
    Ok(())
}
