//! Led drivers
//!
//! A driver owns the hardware behind a set of led channels. The
//! [`Platform`](crate::platform::Platform) creates channels through it and
//! forwards the values computed by the player.

mod memory;
mod pixel;

pub use memory::MemoryDriver;
pub use pixel::{PixelChannel, PixelDriver};

use crate::error::DriverError;

/// Handle of a channel inside its driver
pub type ChannelAddress = usize;

pub trait LedDriver {
    /// Name used to attach leds to this driver
    fn name(&self) -> &str;

    /// Create the channel `channel_id` of led `led_id`
    ///
    /// `parameters` is the backend-specific channel configuration, if any.
    fn channel_new(
        &mut self,
        led_id: &str,
        channel_id: &str,
        parameters: Option<&str>,
    ) -> Result<ChannelAddress, DriverError>;

    /// Set a channel to `value`
    fn set_value(&mut self, address: ChannelAddress, value: u8) -> Result<(), DriverError>;

    /// Called when every channel of every driver has been set for this tick
    fn tick(&mut self) {}
}
