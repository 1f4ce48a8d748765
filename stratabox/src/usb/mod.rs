pub mod descriptor;

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{Config as HidConfig, HidBootProtocol, HidSubclass, HidWriter, State};
use embassy_usb::driver::Driver;
use embassy_usb::{Builder, Handler};
use static_cell::StaticCell;
use usbd_hid::descriptor::SerializedDescriptor;

use crate::config::KeyboardUsbConfig;
use crate::hid::{HidError, KeyEmitter};
use crate::keycode::KeyCode;
use descriptor::KeyboardReport;

/// Size of the keyboard input report
pub const KEYBOARD_REPORT_SIZE: usize = 8;

const USB_BUF_SIZE: usize = 128;

/// Whether the host has configured the device
static USB_CONFIGURED: AtomicBool = AtomicBool::new(false);
/// Signaled every time the host configures the device
static USB_CONFIGURED_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Create the embassy-usb builder for the controller.
///
/// Descriptor buffers and the device handler live in statics, so this can only be called once.
pub fn new_usb_builder<'d, D: Driver<'d>>(driver: D, keyboard_config: KeyboardUsbConfig<'d>) -> Builder<'d, D> {
    // Create embassy-usb Config
    let mut usb_config = embassy_usb::Config::new(keyboard_config.vid, keyboard_config.pid);
    usb_config.manufacturer = Some(keyboard_config.manufacturer);
    usb_config.product = Some(keyboard_config.product_name);
    usb_config.serial_number = Some(keyboard_config.serial_number);
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    static CONFIG_DESC: StaticCell<[u8; USB_BUF_SIZE]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static MSOS_DESC: StaticCell<[u8; 16]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; USB_BUF_SIZE]> = StaticCell::new();

    let mut builder = Builder::new(
        driver,
        usb_config,
        &mut CONFIG_DESC.init([0; USB_BUF_SIZE])[..],
        &mut BOS_DESC.init([0; 16])[..],
        &mut MSOS_DESC.init([0; 16])[..],
        &mut CONTROL_BUF.init([0; USB_BUF_SIZE])[..],
    );

    static DEVICE_HANDLER: StaticCell<UsbDeviceHandler> = StaticCell::new();
    builder.handler(DEVICE_HANDLER.init(UsbDeviceHandler {}));

    builder
}

/// Add the boot keyboard interface to `builder`.
///
/// The interface state is static, so the driver must be too.
pub fn add_keyboard_writer<D: Driver<'static>>(
    builder: &mut Builder<'static, D>,
) -> HidWriter<'static, D, KEYBOARD_REPORT_SIZE> {
    static KEYBOARD_STATE: StaticCell<State> = StaticCell::new();
    let state = KEYBOARD_STATE.init(State::new());

    let hid_config = HidConfig {
        report_descriptor: KeyboardReport::desc(),
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 64,
        hid_subclass: HidSubclass::No,
        hid_boot_protocol: HidBootProtocol::None,
    };
    HidWriter::new(builder, state, hid_config)
}

/// Wait until the host has configured the device.
pub async fn wait_for_configured() {
    while !is_configured() {
        USB_CONFIGURED_SIGNAL.wait().await;
    }
}

pub fn is_configured() -> bool {
    USB_CONFIGURED.load(Ordering::Acquire)
}

/// Sends keystrokes as boot keyboard reports
pub struct UsbKeyboardWriter<'d, D: Driver<'d>> {
    writer: HidWriter<'d, D, KEYBOARD_REPORT_SIZE>,
}

impl<'d, D: Driver<'d>> UsbKeyboardWriter<'d, D> {
    pub fn new(writer: HidWriter<'d, D, KEYBOARD_REPORT_SIZE>) -> Self {
        Self { writer }
    }

    async fn write_report(&mut self, report: &KeyboardReport) -> Result<(), HidError> {
        self.writer.write_serialize(report).await.map_err(HidError::from)
    }
}

impl<'d, D: Driver<'d>> KeyEmitter for UsbKeyboardWriter<'d, D> {
    async fn press(&mut self, key: KeyCode) -> Result<(), HidError> {
        self.write_report(&KeyboardReport::pressed(key)).await
    }

    async fn release(&mut self, _key: KeyCode) -> Result<(), HidError> {
        // Only one key is ever down, releasing it empties the report
        self.write_report(&KeyboardReport::released()).await
    }
}

struct UsbDeviceHandler {}

impl Handler for UsbDeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        if enabled {
            info!("Device enabled");
        } else {
            info!("Device disabled");
            USB_CONFIGURED.store(false, Ordering::Release);
        }
    }

    fn reset(&mut self) {
        info!("Bus reset, the Vbus current limit is 100mA");
        USB_CONFIGURED.store(false, Ordering::Release);
    }

    fn addressed(&mut self, addr: u8) {
        info!("USB address set to: {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        USB_CONFIGURED.store(configured, Ordering::Release);
        if configured {
            info!("Device configured, the keyboard is ready");
            USB_CONFIGURED_SIGNAL.signal(());
        } else {
            info!("Device is no longer configured");
        }
    }

    fn suspended(&mut self, suspended: bool) {
        if suspended {
            info!("Device suspended");
        } else {
            info!("Device resumed");
        }
    }
}
