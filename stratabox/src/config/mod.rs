mod macro_config;
mod usb_config;

use embassy_time::Duration;
pub use macro_config::GestureConfig;
pub use usb_config::KeyboardUsbConfig;

use crate::button::{Role, RoleMap};
use crate::keycode::KeyCode;

/// The config struct for the StrataBox controller.
///
/// Everything is static: the controller never persists or reloads configuration.
#[derive(Clone, Debug)]
pub struct StrataboxConfig<'a> {
    /// Key sent by each button
    pub keys: KeyConfig,
    /// Key sent by the menu button when practice mode is latched at boot
    pub practice_menu_key: KeyCode,
    pub timing: TimingConfig,
    pub gesture: GestureConfig,
    pub light: LightConfig,
    pub usb_config: KeyboardUsbConfig<'a>,
}

impl Default for StrataboxConfig<'_> {
    fn default() -> Self {
        Self {
            keys: KeyConfig::default(),
            practice_menu_key: KeyCode::R,
            timing: TimingConfig::default(),
            gesture: GestureConfig::default(),
            light: LightConfig::default(),
            usb_config: KeyboardUsbConfig::default(),
        }
    }
}

/// Errors found while building the controller from its configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No pin or no key was given for this role
    MissingRole(Role),
    /// The role was given more than once
    DuplicateRole(Role),
    /// The macro doesn't fit in `MACRO_MAX_KEYS`
    MacroTooLong,
}

/// Key mapping of the five buttons
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyConfig {
    pub menu: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            menu: KeyCode::P,
            up: KeyCode::Up,
            down: KeyCode::Down,
            left: KeyCode::Left,
            right: KeyCode::Right,
        }
    }
}

impl KeyConfig {
    /// Build the key mapping from `(role, key)` entries, every role is required.
    pub fn from_entries(entries: impl IntoIterator<Item = (Role, KeyCode)>) -> Result<Self, ConfigError> {
        let [menu, up, down, left, right] = RoleMap::from_entries(entries)?.into_array();
        let keys = Self {
            menu,
            up,
            down,
            left,
            right,
        };
        keys.validate()?;
        Ok(keys)
    }

    /// A role mapped to `KeyCode::No` would never send anything, treat it as missing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match Role::ALL.into_iter().find(|role| self.key(*role) == KeyCode::No) {
            Some(role) => Err(ConfigError::MissingRole(role)),
            None => Ok(()),
        }
    }

    pub fn key(&self, role: Role) -> KeyCode {
        match role {
            Role::Menu => self.menu,
            Role::Up => self.up,
            Role::Down => self.down,
            Role::Left => self.left,
            Role::Right => self.right,
        }
    }
}

/// Timing of scanning, debouncing and keystroke emission
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Minimal time between two accepted presses of the same button
    pub debounce_interval: Duration,
    /// The gesture presses must all fall within this time from the first one
    pub gesture_window: Duration,
    /// Time a key is held down for every keystroke
    pub hold_delay: Duration,
    /// Pause after each key of a macro
    pub inter_key_delay: Duration,
    /// Pause between the keystroke which completed the gesture and the macro
    pub macro_lead_in: Duration,
    /// Pause between two scan passes
    pub poll_interval: Duration,
    /// Wait before sampling the boot latch, letting the inputs settle
    pub boot_settle: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_interval: Duration::from_millis(50),
            gesture_window: Duration::from_secs(1),
            hold_delay: Duration::from_millis(10),
            inter_key_delay: Duration::from_millis(50),
            macro_lead_in: Duration::from_millis(50),
            poll_interval: Duration::from_millis(10),
            boot_settle: Duration::from_millis(500),
        }
    }
}

/// Config for the status led
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightConfig {
    /// Set to false to keep the led dark
    pub enabled: bool,
    pub low_active: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            low_active: false,
        }
    }
}
