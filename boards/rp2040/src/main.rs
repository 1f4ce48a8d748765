#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_time::Delay;
#[cfg(feature = "button_test")]
use stratabox::button_test::ButtonTester;
use stratabox::usb::{add_keyboard_writer, new_usb_builder};
#[cfg(not(feature = "button_test"))]
use stratabox::usb::{UsbKeyboardWriter, wait_for_configured};
use stratabox::{Role, StrataboxConfig};
#[cfg(not(feature = "button_test"))]
use stratabox::Controller;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("StrataBox start!");
    // Initialize peripherals
    let p = embassy_rp::init(Default::default());

    let config = StrataboxConfig::default();

    // Create the usb driver, from the HAL
    let driver = Driver::new(p.USB, Irqs);
    let mut builder = new_usb_builder(driver, config.usb_config);
    let keyboard_writer = add_keyboard_writer(&mut builder);
    let mut usb_device = builder.build();

    // Buttons short the pulled-up inputs to ground
    let pins = [
        (Role::Menu, Input::new(p.PIN_15, Pull::Up)),
        (Role::Up, Input::new(p.PIN_16, Pull::Up)),
        (Role::Down, Input::new(p.PIN_17, Pull::Up)),
        (Role::Left, Input::new(p.PIN_18, Pull::Up)),
        (Role::Right, Input::new(p.PIN_19, Pull::Up)),
    ];
    // On-board LED
    let led = Output::new(p.PIN_25, Level::Low);

    #[cfg(feature = "button_test")]
    {
        let mut tester = match ButtonTester::new(pins, Delay, Some(led), &config) {
            Ok(tester) => tester,
            Err(e) => defmt::panic!("Invalid StrataBox config: {:?}", e),
        };
        // Keep the USB device alive, the host just sees a silent keyboard
        drop(keyboard_writer);
        join(usb_device.run(), tester.run()).await;
    }

    #[cfg(not(feature = "button_test"))]
    {
        let mut controller = match Controller::new(
            pins,
            UsbKeyboardWriter::new(keyboard_writer),
            Delay,
            Some(led),
            &config,
        ) {
            Ok(controller) => controller,
            Err(e) => defmt::panic!("Invalid StrataBox config: {:?}", e),
        };

        let control = async {
            // The buttons are sampled while the host enumerates the device
            controller.latch_boot_mode().await;
            wait_for_configured().await;
            let Err(e) = controller.run().await;
            // The panic handler resets the board
            defmt::panic!("Sending keystrokes failed: {:?}", e);
        };

        join(usb_device.run(), control).await;
    }
}
