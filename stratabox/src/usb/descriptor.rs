use usbd_hid::descriptor::generator_prelude::*;

use crate::keycode::KeyCode;

/// KeyboardReport describes a boot keyboard report and its companion descriptor.
///
/// The input report is 8 bytes: modifier bits, a reserved byte and six key slots. The host may
/// write the LED bits, the controller has no lock LEDs and ignores them.
#[gen_hid_descriptor(
    (collection = APPLICATION, usage_page = GENERIC_DESKTOP, usage = KEYBOARD) = {
        (usage_page = KEYBOARD, usage_min = 0xE0, usage_max = 0xE7) = {
            #[packed_bits = 8] #[item_settings(data,variable,absolute)] modifier=input;
        };
        (logical_min = 0,) = {
            #[item_settings(constant,variable,absolute)] reserved=input;
        };
        (usage_page = LEDS, usage_min = 0x01, usage_max = 0x05) = {
            #[packed_bits = 5] #[item_settings(data,variable,absolute)] leds=output;
        };
        (usage_page = KEYBOARD, usage_min = 0x00, usage_max = 0xDD) = {
            #[item_settings(data,array,absolute)] keycodes=input;
        };
    }
)]
#[allow(dead_code)]
#[derive(Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub leds: u8,
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Report with only `key` down
    pub fn pressed(key: KeyCode) -> Self {
        let mut report = Self::default();
        if key.is_modifier() {
            report.modifier = key.as_modifier_bit();
        } else {
            report.keycodes[0] = key.as_hid_usage();
        }
        report
    }

    /// Report with every key up
    pub fn released() -> Self {
        Self::default()
    }
}
