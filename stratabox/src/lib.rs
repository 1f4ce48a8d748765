#![cfg_attr(not(test), no_std)]

//! StrataBox: five arcade buttons as a USB keyboard, with a menu gesture that types a stratagem.

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod boot;
pub mod button;
pub mod button_test;
pub mod clock;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod gesture;
pub mod hid;
pub mod keyboard_macros;
pub mod keycode;
pub mod light;
pub mod usb;

pub use boot::BootMode;
pub use button::{ButtonBinding, Role};
pub use clock::Clock;
pub use config::{ConfigError, KeyConfig, KeyboardUsbConfig, LightConfig, StrataboxConfig, TimingConfig};
pub use controller::Controller;
pub use hid::{HidError, KeyEmitter};
pub use keyboard_macros::MacroSequence;
pub use keycode::KeyCode;
