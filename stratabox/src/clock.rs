use core::future::Future;

use embassy_time::{Delay, Duration, Instant};
use embedded_hal_async::delay::DelayNs;

/// Time source of the controller: a monotonic clock plus async delays.
///
/// All timing decisions go through this trait, so the control loop can be driven by a virtual clock
/// on the host.
pub trait Clock: DelayNs {
    /// Current monotonic time
    fn now(&self) -> Instant;

    /// Wait for `duration`
    ///
    /// `DelayNs` takes a `u32` of microseconds, longer waits are split.
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
        async move {
            let mut remaining = duration.as_micros();
            while remaining > 0 {
                let chunk = remaining.min(u32::MAX as u64);
                self.delay_us(chunk as u32).await;
                remaining -= chunk;
            }
        }
    }
}

/// The embassy time driver
impl Clock for Delay {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
