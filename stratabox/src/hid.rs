//! Traits and types for sending keystrokes to the host.

use core::future::Future;

use embassy_time::Duration;
use embassy_usb::driver::EndpointError;

use crate::clock::Clock;
use crate::keycode::KeyCode;

#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidError {
    UsbEndpointError(EndpointError),
    /// The host hasn't configured the device, or it was unplugged
    UsbDisabled,
}

impl From<EndpointError> for HidError {
    fn from(e: EndpointError) -> Self {
        match e {
            EndpointError::Disabled => HidError::UsbDisabled,
            e => HidError::UsbEndpointError(e),
        }
    }
}

/// KeyEmitter sends key state changes to the host, via USB or any other transport.
///
/// The controller never has more than one key down: every `press` is followed by the matching
/// `release` before the next `press`.
pub trait KeyEmitter {
    /// Report `key` as pressed
    fn press(&mut self, key: KeyCode) -> impl Future<Output = Result<(), HidError>>;

    /// Report `key` as released
    fn release(&mut self, key: KeyCode) -> impl Future<Output = Result<(), HidError>>;
}

/// Press `key`, hold it for `hold`, then release it.
///
/// The release is only sent when the press went through, the first error is returned as is.
pub async fn tap_key<E: KeyEmitter, C: Clock>(
    emitter: &mut E,
    clock: &mut C,
    key: KeyCode,
    hold: Duration,
) -> Result<(), HidError> {
    emitter.press(key).await?;
    clock.sleep(hold).await;
    emitter.release(key).await
}
