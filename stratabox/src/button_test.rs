//! Wiring check for freshly assembled boxes.
//!
//! Every press of every button is logged and flashes the status LED. No keystroke is sent, the host
//! sees nothing.

use embassy_time::Duration;
use embedded_hal::digital::{InputPin, OutputPin};
use heapless::Vec;

use crate::button::{ButtonBinding, ROLE_COUNT, Role, RoleMap};
use crate::clock::Clock;
use crate::config::{ConfigError, StrataboxConfig};
use crate::debounce::DebounceState;
use crate::light::StatusLed;

/// On/off time of each blink of the start signal
const START_BLINK: Duration = Duration::from_millis(200);
const START_BLINK_COUNT: usize = 3;
/// How long the LED stays lit for a press
const PRESS_FLASH: Duration = Duration::from_millis(100);

pub struct ButtonTester<In: InputPin, O: OutputPin, C: Clock> {
    buttons: [ButtonBinding<In>; ROLE_COUNT],
    light: StatusLed<O>,
    clock: C,
    poll_interval: Duration,
}

impl<In: InputPin, O: OutputPin, C: Clock> ButtonTester<In, O, C> {
    pub fn new(
        pins: impl IntoIterator<Item = (Role, In)>,
        clock: C,
        led: Option<O>,
        config: &StrataboxConfig,
    ) -> Result<Self, ConfigError> {
        let keys = config.keys;
        let buttons = RoleMap::from_entries(pins)?
            .map(|role, pin| ButtonBinding::new(role, pin, keys.key(role)))
            .into_array();
        Ok(Self {
            buttons,
            light: StatusLed::new(led, &config.light),
            clock,
            poll_interval: config.timing.poll_interval,
        })
    }

    /// Blink the start signal, then report presses forever.
    pub async fn run(&mut self) {
        self.light
            .blink(&mut self.clock, START_BLINK_COUNT, START_BLINK)
            .await;
        info!("Button test: press each button to check its wiring");
        loop {
            self.scan().await;
            self.clock.sleep(self.poll_interval).await;
        }
    }

    /// Sample every button once, returns the roles pressed since the previous scan.
    ///
    /// Presses aren't debounced: a bouncing switch shows up as several presses.
    pub async fn scan(&mut self) -> Vec<Role, ROLE_COUNT> {
        let mut pressed = Vec::new();
        for idx in 0..ROLE_COUNT {
            let now = self.clock.now();
            let button = &mut self.buttons[idx];
            if button.poll(now, Duration::from_ticks(0)) != DebounceState::Debounced {
                continue;
            }
            info!("Button pressed: {:?} ({:?} key)", button.role(), button.key());
            // Capacity is the number of buttons, can't overflow
            pressed.push(button.role()).ok();

            self.light.on();
            self.clock.sleep(PRESS_FLASH).await;
            self.light.off();
        }
        pressed
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
