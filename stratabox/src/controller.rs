use core::convert::Infallible;

use embassy_time::Instant;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::boot::BootMode;
use crate::button::{ButtonBinding, ROLE_COUNT, Role, RoleMap};
use crate::clock::Clock;
use crate::config::{ConfigError, KeyConfig, StrataboxConfig, TimingConfig};
use crate::debounce::DebounceState;
use crate::gesture::{GestureDetector, GestureOutcome};
use crate::hid::{HidError, KeyEmitter, tap_key};
use crate::keyboard_macros::{MacroSequence, play_macro};
use crate::keycode::KeyCode;
use crate::light::StatusLed;

/// Role whose presses feed the gesture detector.
///
/// The gesture follows the physical button, not the key it sends, so it keeps working in practice mode.
pub const GESTURE_ROLE: Role = Role::Menu;

/// The StrataBox control loop.
///
/// Owns the five buttons, their debouncers and the gesture detector, and sends every keystroke
/// through the emitter. Everything runs in one task: a keystroke or a macro always completes
/// before the next button is looked at.
pub struct Controller<In: InputPin, O: OutputPin, E: KeyEmitter, C: Clock> {
    /// Buttons in scan order
    buttons: [ButtonBinding<In>; ROLE_COUNT],
    gesture: GestureDetector,
    /// Played when the gesture triggers
    sequence: MacroSequence,
    emitter: E,
    clock: C,
    light: StatusLed<O>,
    timing: TimingConfig,
    /// Key mapping before the boot latch
    keys: KeyConfig,
    practice_menu_key: KeyCode,
    /// `None` until the boot latch is sampled
    boot_mode: Option<BootMode>,
}

impl<In: InputPin, O: OutputPin, E: KeyEmitter, C: Clock> Controller<In, O, E, C> {
    /// Build the controller from `(role, pin)` entries, given in any order.
    ///
    /// Every role needs exactly one pin and a key.
    pub fn new(
        pins: impl IntoIterator<Item = (Role, In)>,
        emitter: E,
        clock: C,
        led: Option<O>,
        config: &StrataboxConfig,
    ) -> Result<Self, ConfigError> {
        config.keys.validate()?;
        let keys = config.keys;
        let buttons = RoleMap::from_entries(pins)?
            .map(|role, pin| ButtonBinding::new(role, pin, keys.key(role)))
            .into_array();

        Ok(Self {
            buttons,
            gesture: GestureDetector::new(config.gesture.presses, config.timing.gesture_window),
            sequence: config.gesture.sequence.clone(),
            emitter,
            clock,
            light: StatusLed::new(led, &config.light),
            timing: config.timing,
            keys,
            practice_menu_key: config.practice_menu_key,
            boot_mode: None,
        })
    }

    /// Run the boot sequence then scan forever.
    ///
    /// Returns only when a keystroke can't be sent.
    pub async fn run(&mut self) -> Result<Infallible, HidError> {
        if self.boot_mode.is_none() {
            self.latch_boot_mode().await;
        }
        info!("StrataBox ready, scanning buttons");
        loop {
            self.run_pass().await?;
        }
    }

    /// Wait for the inputs to settle, then sample the boot latch and signal readiness.
    ///
    /// The sampled levels also seed the debouncers: a button held at boot doesn't send its key
    /// until it's released and pressed again.
    ///
    /// The latch is sampled once: later calls return the latched mode without touching the pins.
    pub async fn latch_boot_mode(&mut self) -> BootMode {
        if let Some(latched) = self.boot_mode {
            warn!("Boot mode already latched: {:?}, not sampling again", latched);
            return latched;
        }

        self.clock.sleep(self.timing.boot_settle).await;

        let mut held = [false; ROLE_COUNT];
        for (slot, button) in held.iter_mut().zip(self.buttons.iter_mut()) {
            *slot = button.latch_level();
        }
        let mode = BootMode::from_held(|role| held[role.index()]);
        self.apply_boot_mode(mode);

        self.light.ready_signal(&mut self.clock).await;
        mode
    }

    /// Latch the boot modes. Only the first call has an effect.
    pub fn apply_boot_mode(&mut self, mode: BootMode) {
        if let Some(latched) = self.boot_mode {
            warn!("Boot mode already latched: {:?}, ignoring {:?}", latched, mode);
            return;
        }

        if mode.practice {
            self.buttons[Role::Menu.index()].set_key(self.practice_menu_key);
            info!("Practice mode: menu button sends {:?}", self.practice_menu_key);
        } else {
            self.buttons[Role::Menu.index()].set_key(self.keys.menu);
        }

        if mode.armed {
            self.gesture.arm();
            info!("SOS mode: the menu gesture plays the macro");
        } else {
            info!("SOS mode off");
        }
        self.boot_mode = Some(mode);
    }

    /// One scan pass followed by the poll interval.
    pub async fn run_pass(&mut self) -> Result<(), HidError> {
        self.scan().await?;
        self.clock.sleep(self.timing.poll_interval).await;
        Ok(())
    }

    /// Sample every button once, in scan order, and handle the accepted presses.
    pub async fn scan(&mut self) -> Result<(), HidError> {
        for idx in 0..ROLE_COUNT {
            let now = self.clock.now();
            let button = &mut self.buttons[idx];
            match button.poll(now, self.timing.debounce_interval) {
                DebounceState::Debounced => {
                    let (role, key) = (button.role(), button.key());
                    debug!("Press {:?}, sending {:?}", role, key);
                    self.on_press(role, key, now).await?;
                }
                DebounceState::InProgress => {
                    trace!("Bounce on {:?} dropped", button.role());
                }
                DebounceState::Ignored => (),
            }
        }
        Ok(())
    }

    async fn on_press(&mut self, role: Role, key: KeyCode, now: Instant) -> Result<(), HidError> {
        self.light.on();
        let sent = tap_key(&mut self.emitter, &mut self.clock, key, self.timing.hold_delay).await;
        self.light.off();
        if let Err(e) = sent {
            error!("Failed to send {:?}: {:?}", key, e);
            return Err(e);
        }

        if role != GESTURE_ROLE {
            return Ok(());
        }

        match self.gesture.on_press(now) {
            GestureOutcome::Counting(presses) => {
                debug!("Gesture press {}", presses);
            }
            GestureOutcome::Absorbed => {
                info!("Gesture completed, macro not armed");
            }
            GestureOutcome::Triggered => {
                info!("Gesture completed, playing macro");
                self.light.on();
                let played = play_macro(&self.sequence, &mut self.emitter, &mut self.clock, &self.timing).await;
                self.light.off();
                if let Err(e) = played {
                    error!("Macro aborted: {:?}", e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    pub fn boot_mode(&self) -> Option<BootMode> {
        self.boot_mode
    }

    pub fn gesture(&self) -> &GestureDetector {
        &self.gesture
    }

    pub fn buttons(&self) -> &[ButtonBinding<In>] {
        &self.buttons
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
