use embassy_time::Duration;
use embedded_hal::digital::{OutputPin, PinState};

use crate::clock::Clock;
use crate::config::LightConfig;

/// On/off time of each blink of the ready signal
const READY_BLINK: Duration = Duration::from_millis(100);
/// Number of blinks of the ready signal
const READY_BLINK_COUNT: usize = 3;

/// The status LED.
///
/// It's lit while a keystroke is sent and blinks once the controller is ready.
/// A board without LED, or with the LED disabled in [`LightConfig`], gets a dark indicator.
/// Pin errors are ignored: the LED is never worth stopping the controller for.
pub struct StatusLed<P: OutputPin> {
    /// GPIO for controlling the LED
    pin: Option<P>,
    /// Pin state when turning LED on
    on_state: PinState,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: Option<P>, config: &LightConfig) -> Self {
        let on_state = if config.low_active { PinState::Low } else { PinState::High };
        let mut led = Self {
            pin: pin.filter(|_| config.enabled),
            on_state,
        };
        led.off();
        led
    }

    /// Turn LED on
    pub fn on(&mut self) {
        if let Some(pin) = self.pin.as_mut() {
            pin.set_state(self.on_state).ok();
        }
    }

    /// Turn LED off
    pub fn off(&mut self) {
        if let Some(pin) = self.pin.as_mut() {
            pin.set_state(!self.on_state).ok();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.pin.is_some()
    }

    /// Blink `times` times, with `period` on then `period` off.
    pub async fn blink<C: Clock>(&mut self, clock: &mut C, times: usize, period: Duration) {
        if !self.is_enabled() {
            return;
        }
        for _ in 0..times {
            self.on();
            clock.sleep(period).await;
            self.off();
            clock.sleep(period).await;
        }
    }

    /// Three short blinks, the controller is about to enter its scan loop.
    pub async fn ready_signal<C: Clock>(&mut self, clock: &mut C) {
        self.blink(clock, READY_BLINK_COUNT, READY_BLINK).await;
    }
}
