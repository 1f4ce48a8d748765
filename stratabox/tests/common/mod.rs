#![allow(dead_code)]

use core::convert::Infallible;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embassy_futures::block_on;
use embassy_time::{Duration, Instant};
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use stratabox::{BootMode, Clock, Controller, HidError, KeyCode, KeyEmitter, Role, StrataboxConfig};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub type SharedTime = Rc<Cell<Instant>>;

pub fn ms(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

/// Clock whose delays complete immediately and advance a shared virtual time
#[derive(Clone)]
pub struct VirtualClock {
    now: SharedTime,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::from_ticks(0))),
        }
    }

    pub fn time(&self) -> SharedTime {
        self.now.clone()
    }

    fn advance(&mut self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl DelayNs for VirtualClock {
    async fn delay_ns(&mut self, ns: u32) {
        self.advance(Duration::from_nanos(ns as u64));
    }

    async fn delay_us(&mut self, us: u32) {
        self.advance(Duration::from_micros(us as u64));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.advance(Duration::from_millis(ms as u64));
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Button held down during fixed intervals of virtual time
pub struct ScriptedButton {
    now: SharedTime,
    /// `(start, end)` of every hold, end excluded
    holds: Vec<(Instant, Instant)>,
}

impl ScriptedButton {
    pub fn new(now: SharedTime) -> Self {
        Self { now, holds: Vec::new() }
    }

    /// Hold the button from `start_ms` for `duration_ms`
    pub fn hold(&mut self, start_ms: u64, duration_ms: u64) {
        self.holds.push((ms(start_ms), ms(start_ms + duration_ms)));
    }
}

impl ErrorType for ScriptedButton {
    type Error = Infallible;
}

impl InputPin for ScriptedButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let now = self.now.get();
        Ok(self.holds.iter().any(|(start, end)| *start <= now && now < *end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press(KeyCode),
    Release(KeyCode),
}

pub type EventLog = Rc<RefCell<Vec<(Instant, KeyEvent)>>>;

/// Emitter recording every key change with its time
pub struct RecordingEmitter {
    now: SharedTime,
    events: EventLog,
    /// Fail every emission once this many events were recorded
    fail_after: Option<usize>,
}

impl RecordingEmitter {
    pub fn new(now: SharedTime) -> Self {
        Self {
            now,
            events: Rc::new(RefCell::new(Vec::new())),
            fail_after: None,
        }
    }

    pub fn failing_after(now: SharedTime, count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::new(now)
        }
    }

    pub fn events(&self) -> EventLog {
        self.events.clone()
    }

    fn record(&mut self, event: KeyEvent) -> Result<(), HidError> {
        let mut events = self.events.borrow_mut();
        if self.fail_after.is_some_and(|count| events.len() >= count) {
            return Err(HidError::UsbDisabled);
        }
        events.push((self.now.get(), event));
        Ok(())
    }
}

impl KeyEmitter for RecordingEmitter {
    async fn press(&mut self, key: KeyCode) -> Result<(), HidError> {
        self.record(KeyEvent::Press(key))
    }

    async fn release(&mut self, key: KeyCode) -> Result<(), HidError> {
        self.record(KeyEvent::Release(key))
    }
}

pub type LedLog = Rc<RefCell<Vec<(Instant, bool)>>>;

/// Active-high LED recording every level it's set to
pub struct FakeLed {
    now: SharedTime,
    levels: LedLog,
}

impl FakeLed {
    pub fn new(now: SharedTime) -> Self {
        Self {
            now,
            levels: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn levels(&self) -> LedLog {
        self.levels.clone()
    }
}

impl ErrorType for FakeLed {
    type Error = Infallible;
}

impl OutputPin for FakeLed {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push((self.now.get(), false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push((self.now.get(), true));
        Ok(())
    }
}

pub type TestController = Controller<ScriptedButton, FakeLed, RecordingEmitter, VirtualClock>;

/// A controller wired to scripted buttons, plus handles on everything it outputs
pub struct TestBench {
    pub controller: TestController,
    pub time: SharedTime,
    pub events: EventLog,
    pub led: LedLog,
}

/// Hold of one button: `(role, start_ms, duration_ms)`
pub type Hold = (Role, u64, u64);

pub fn create_test_bench(holds: &[Hold], config: &StrataboxConfig) -> TestBench {
    create_test_bench_with_emitter(holds, config, RecordingEmitter::new)
}

pub fn create_test_bench_with_emitter(
    holds: &[Hold],
    config: &StrataboxConfig,
    emitter: impl FnOnce(SharedTime) -> RecordingEmitter,
) -> TestBench {
    let clock = VirtualClock::new();
    let time = clock.time();

    let pins = Role::ALL.map(|role| {
        let mut button = ScriptedButton::new(time.clone());
        for (_, start, duration) in holds.iter().filter(|(r, _, _)| *r == role) {
            button.hold(*start, *duration);
        }
        (role, button)
    });

    let emitter = emitter(time.clone());
    let events = emitter.events();
    let led = FakeLed::new(time.clone());
    let led_levels = led.levels();

    let controller = Controller::new(pins, emitter, clock, Some(led), config).unwrap();
    TestBench {
        controller,
        time,
        events,
        led: led_levels,
    }
}

impl TestBench {
    /// Skip the boot sequence and latch `mode` directly, scanning starts at time 0
    pub fn with_boot_mode(mut self, mode: BootMode) -> Self {
        self.controller.apply_boot_mode(mode);
        self
    }

    /// Run scan passes until the virtual time reaches `end_ms`
    pub fn run_until(&mut self, end_ms: u64) {
        let end = ms(end_ms);
        block_on(async {
            while self.time.get() < end {
                self.controller.run_pass().await.unwrap();
            }
        });
    }

    /// Keys pressed, in order
    pub fn pressed_keys(&self) -> Vec<KeyCode> {
        self.events
            .borrow()
            .iter()
            .filter_map(|(_, event)| match event {
                KeyEvent::Press(key) => Some(*key),
                KeyEvent::Release(_) => None,
            })
            .collect()
    }

    /// Times at which `key` was pressed
    pub fn press_times(&self, key: KeyCode) -> Vec<Instant> {
        self.events
            .borrow()
            .iter()
            .filter(|(_, event)| *event == KeyEvent::Press(key))
            .map(|(time, _)| *time)
            .collect()
    }
}

pub const SOS: [KeyCode; 5] = [KeyCode::Up, KeyCode::Down, KeyCode::Right, KeyCode::Left, KeyCode::Up];

pub const ARMED: BootMode = BootMode {
    practice: false,
    armed: true,
};

pub const DISARMED: BootMode = BootMode {
    practice: false,
    armed: false,
};
