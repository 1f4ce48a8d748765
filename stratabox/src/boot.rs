use crate::button::Role;

/// Button which, held at boot, enables practice mode
pub const PRACTICE_ROLE: Role = Role::Menu;
/// Button which, held at boot, arms the gesture macro
pub const ARMING_ROLE: Role = Role::Up;

/// Modes latched once at boot, from the buttons held while the controller starts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootMode {
    /// The menu button sends the practice key instead of its mapped key
    pub practice: bool,
    /// The menu gesture plays the macro
    pub armed: bool,
}

impl BootMode {
    /// Decide the modes from the levels of the buttons sampled at boot.
    pub fn from_held(held: impl Fn(Role) -> bool) -> Self {
        Self {
            practice: held(PRACTICE_ROLE),
            armed: held(ARMING_ROLE),
        }
    }
}
