use crate::error::DriverError;

/// Destination of the values computed by the player
///
/// Implemented by [`Platform`](crate::platform::Platform), or by anything
/// able to push a value to a led channel.
pub trait OutputSink {
    /// Set one channel of a led
    fn apply_value(&mut self, led_id: &str, channel_id: &str, value: u8) -> Result<(), DriverError>;

    /// Set every channel of a led to the same value
    fn apply_default(&mut self, led_id: &str, value: u8) -> Result<(), DriverError>;

    /// Called once all the values of a tick have been applied
    ///
    /// Allows backends to batch their writes.
    fn end_of_tick(&mut self) {}
}
