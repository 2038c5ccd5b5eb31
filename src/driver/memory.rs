use alloc::vec::Vec;

use super::{ChannelAddress, LedDriver};
use crate::error::DriverError;

const DRIVER_NAME: &str = "memory";

/// Driver keeping channel values in memory
///
/// Used for simulation, or for leds driven by polling the stored values.
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    values: Vec<u8>,
    ticks: u32,
}

impl MemoryDriver {
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            ticks: 0,
        }
    }

    pub fn value(&self, address: ChannelAddress) -> Option<u8> {
        self.values.get(address).copied()
    }

    /// Number of completed ticks
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }
}

impl LedDriver for MemoryDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn channel_new(
        &mut self,
        _led_id: &str,
        _channel_id: &str,
        _parameters: Option<&str>,
    ) -> Result<ChannelAddress, DriverError> {
        self.values.push(0);
        Ok(self.values.len() - 1)
    }

    fn set_value(&mut self, address: ChannelAddress, value: u8) -> Result<(), DriverError> {
        let slot = self.values.get_mut(address).ok_or(DriverError::Write {
            driver: DRIVER_NAME,
            reason: "no such channel",
        })?;
        *slot = value;
        Ok(())
    }

    fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }
}
