pub mod common;

use embassy_futures::block_on;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
use stratabox::{BootMode, Controller, Role, StrataboxConfig};

use crate::common::*;

/// One pin per role, each read exactly once with the given level
fn boot_pins(held: &[Role]) -> [(Role, PinMock); 5] {
    Role::ALL.map(|role| {
        let level = if held.contains(&role) { State::Low } else { State::High };
        (role, PinMock::new(&[Transaction::get(level)]))
    })
}

fn latch(held: &[Role]) -> BootMode {
    let pins = boot_pins(held);
    let mut mocks: Vec<PinMock> = pins.iter().map(|(_, pin)| pin.clone()).collect();

    // Off at power on, then the three ready blinks
    let led_transactions = [
        Transaction::set(State::Low),
        Transaction::set(State::High),
        Transaction::set(State::Low),
        Transaction::set(State::High),
        Transaction::set(State::Low),
        Transaction::set(State::High),
        Transaction::set(State::Low),
    ];
    let mut led = PinMock::new(&led_transactions);

    let clock = VirtualClock::new();
    let emitter = RecordingEmitter::new(clock.time());
    let events = emitter.events();
    let mut controller =
        Controller::new(pins, emitter, clock, Some(led.clone()), &StrataboxConfig::default()).unwrap();

    let mode = block_on(controller.latch_boot_mode());

    for mock in mocks.iter_mut() {
        mock.done();
    }
    led.done();
    assert!(events.borrow().is_empty());
    mode
}

#[test]
fn test_boot_nothing_held() {
    assert_eq!(latch(&[]), BootMode::default());
}

#[test]
fn test_boot_menu_held_selects_practice() {
    assert_eq!(
        latch(&[Role::Menu]),
        BootMode {
            practice: true,
            armed: false
        }
    );
}

#[test]
fn test_boot_up_held_arms_gesture() {
    assert_eq!(
        latch(&[Role::Up]),
        BootMode {
            practice: false,
            armed: true
        }
    );
}

#[test]
fn test_boot_both_held() {
    assert_eq!(
        latch(&[Role::Menu, Role::Up]),
        BootMode {
            practice: true,
            armed: true
        }
    );
}

#[test]
fn test_boot_ignores_other_buttons() {
    assert_eq!(latch(&[Role::Down, Role::Left, Role::Right]), BootMode::default());
}
