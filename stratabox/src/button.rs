use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

use crate::config::ConfigError;
use crate::debounce::{DebounceState, EdgeDebouncer};
use crate::keycode::KeyCode;

/// Number of physical buttons on the controller
pub const ROLE_COUNT: usize = 5;

/// Logical role of a physical button.
///
/// The declaration order is the order buttons are scanned in every pass.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Opens the stratagem menu, also the gesture button
    Menu = 0,
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
}

impl Role {
    /// All roles, in scan order
    pub const ALL: [Role; ROLE_COUNT] = [Role::Menu, Role::Up, Role::Down, Role::Left, Role::Right];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// One value per [`Role`], stored in scan order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RoleMap<T>([T; ROLE_COUNT]);

impl<T> RoleMap<T> {
    /// Build the map from `(role, value)` entries given in any order.
    ///
    /// Every role must appear exactly once.
    pub fn from_entries(entries: impl IntoIterator<Item = (Role, T)>) -> Result<Self, ConfigError> {
        let mut slots: [Option<T>; ROLE_COUNT] = [None, None, None, None, None];
        for (role, value) in entries {
            let slot = &mut slots[role.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateRole(role));
            }
            *slot = Some(value);
        }

        match slots {
            [Some(menu), Some(up), Some(down), Some(left), Some(right)] => Ok(Self([menu, up, down, left, right])),
            slots => {
                let missing = slots.iter().position(Option::is_none).unwrap_or_default();
                Err(ConfigError::MissingRole(Role::ALL[missing]))
            }
        }
    }

    pub fn get(&self, role: Role) -> &T {
        &self.0[role.index()]
    }

    pub fn get_mut(&mut self, role: Role) -> &mut T {
        &mut self.0[role.index()]
    }

    /// Transform each value, the closure also receives the role it belongs to.
    pub fn map<U>(self, mut f: impl FnMut(Role, T) -> U) -> RoleMap<U> {
        let [menu, up, down, left, right] = self.0;
        RoleMap([
            f(Role::Menu, menu),
            f(Role::Up, up),
            f(Role::Down, down),
            f(Role::Left, left),
            f(Role::Right, right),
        ])
    }

    pub fn into_array(self) -> [T; ROLE_COUNT] {
        self.0
    }
}

/// A physical button bound to the key it sends.
///
/// Buttons are wired active-low: the input is pulled up and the switch shorts it to ground.
pub struct ButtonBinding<In: InputPin> {
    role: Role,
    pin: In,
    key: KeyCode,
    debouncer: EdgeDebouncer,
}

impl<In: InputPin> ButtonBinding<In> {
    pub fn new(role: Role, pin: In, key: KeyCode) -> Self {
        Self {
            role,
            pin,
            key,
            debouncer: EdgeDebouncer::new(),
        }
    }

    /// Read the normalized level. A failed read counts as released.
    pub fn is_pressed(&mut self) -> bool {
        self.pin.is_low().ok().unwrap_or_default()
    }

    /// Sample the pin and run it through the debouncer.
    pub fn poll(&mut self, now: Instant, debounce_interval: Duration) -> DebounceState {
        let pressed = self.is_pressed();
        self.debouncer
            .detect_change_with_debounce(pressed, now, debounce_interval)
    }

    /// Sample the pin once and store the level without producing an event.
    pub(crate) fn latch_level(&mut self) -> bool {
        let pressed = self.is_pressed();
        self.debouncer.sync_level(pressed);
        pressed
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn key(&self) -> KeyCode {
        self.key
    }

    pub(crate) fn set_key(&mut self, key: KeyCode) {
        self.key = key;
    }

    pub fn debouncer(&self) -> &EdgeDebouncer {
        &self.debouncer
    }
}
