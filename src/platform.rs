//! Led platform
//!
//! Registry of the leds, their channels and the drivers behind them. It is
//! the [`OutputSink`] the player writes to: values are cached per channel so
//! that drivers are only called when a channel actually changes.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::driver::{ChannelAddress, LedDriver};
use crate::error::DriverError;
use crate::sink::OutputSink;

/// Maximum number of channels a led can have
pub const LED_MAX_CHANNELS_PER_LED: usize = 8;

/// Maximum number of drivers which can be registered
pub const LED_MAX_DRIVERS: usize = 10;

#[derive(Debug)]
struct LedChannel {
    id: String,
    /// Last value written
    value: u8,
    address: ChannelAddress,
}

#[derive(Debug)]
struct Led {
    id: String,
    driver: usize,
    channels: heapless::Vec<LedChannel, LED_MAX_CHANNELS_PER_LED>,
}

impl Led {
    fn channel_mut(&mut self, channel_id: &str) -> Option<&mut LedChannel> {
        self.channels.iter_mut().find(|c| c.id == channel_id)
    }
}

#[derive(Default)]
pub struct Platform {
    drivers: heapless::Vec<Box<dyn LedDriver>, LED_MAX_DRIVERS>,
    leds: Vec<Led>,
}

impl Platform {
    pub const fn new() -> Self {
        Self {
            drivers: heapless::Vec::new(),
            leds: Vec::new(),
        }
    }

    pub fn register_driver(&mut self, driver: Box<dyn LedDriver>) -> Result<(), DriverError> {
        log::debug!("register driver {}", driver.name());
        self.drivers
            .push(driver)
            .map_err(|_| DriverError::CapacityExceeded("drivers"))
    }

    /// Create a led driven by the driver named `driver_name`
    pub fn add_led(&mut self, driver_name: &str, led_id: &str) -> Result<(), DriverError> {
        log::debug!("add_led({}, {})", driver_name, led_id);

        let driver = self
            .drivers
            .iter()
            .position(|d| d.name() == driver_name)
            .ok_or_else(|| DriverError::UnknownDriver(driver_name.into()))?;
        if self.leds.iter().any(|led| led.id == led_id) {
            return Err(DriverError::DuplicateLed(led_id.into()));
        }
        self.leds.push(Led {
            id: led_id.into(),
            driver,
            channels: heapless::Vec::new(),
        });

        Ok(())
    }

    /// Create a channel of an existing led
    pub fn add_channel(
        &mut self,
        led_id: &str,
        channel_id: &str,
        parameters: Option<&str>,
    ) -> Result<(), DriverError> {
        log::debug!("add_channel({}, {}, {:?})", led_id, channel_id, parameters);

        let led = self
            .leds
            .iter_mut()
            .find(|led| led.id == led_id)
            .ok_or_else(|| DriverError::UnknownLed(led_id.into()))?;
        if led.channels.is_full() {
            return Err(DriverError::CapacityExceeded("channels per led"));
        }
        if led.channel_mut(channel_id).is_some() {
            return Err(DriverError::DuplicateChannel {
                led: led_id.into(),
                channel: channel_id.into(),
            });
        }
        let driver = self
            .drivers
            .get_mut(led.driver)
            .ok_or_else(|| DriverError::UnknownLed(led_id.into()))?;
        let address = driver.channel_new(led_id, channel_id, parameters)?;

        led.channels
            .push(LedChannel {
                id: channel_id.into(),
                value: 0,
                address,
            })
            .map_err(|_| DriverError::CapacityExceeded("channels per led"))
    }

    /// Set the value of a led channel, skipping the driver if unchanged
    pub fn set_value(&mut self, led_id: &str, channel_id: &str, value: u8) -> Result<(), DriverError> {
        let led = self
            .leds
            .iter_mut()
            .find(|led| led.id == led_id)
            .ok_or_else(|| DriverError::UnknownLed(led_id.into()))?;
        let driver = self
            .drivers
            .get_mut(led.driver)
            .ok_or_else(|| DriverError::UnknownLed(led_id.into()))?;
        let channel = led
            .channel_mut(channel_id)
            .ok_or_else(|| DriverError::UnknownChannel {
                led: led_id.into(),
                channel: channel_id.into(),
            })?;

        if channel.value == value {
            return Ok(());
        }
        channel.value = value;

        driver.set_value(channel.address, value)
    }

    /// Set every channel of a led, returning the last failure if any
    pub fn set_led_value(&mut self, led_id: &str, value: u8) -> Result<(), DriverError> {
        let led = self
            .leds
            .iter()
            .find(|led| led.id == led_id)
            .ok_or_else(|| DriverError::UnknownLed(led_id.into()))?;
        let channels: Vec<String> = led.channels.iter().map(|c| c.id.clone()).collect();

        let mut result = Ok(());
        for channel in channels {
            if let Err(err) = self.set_value(led_id, &channel, value) {
                log::warn!("set_value({}, {}, {}): {}", led_id, channel, value, err);
                result = Err(err);
            }
        }

        result
    }

    /// Switch every channel of every led off
    pub fn paint_it_black(&mut self) -> Result<(), DriverError> {
        let leds: Vec<String> = self.leds.iter().map(|led| led.id.clone()).collect();

        let mut result = Ok(());
        for led in leds {
            if let Err(err) = self.set_led_value(&led, 0) {
                log::warn!("set_led_value({}, 0): {}", led, err);
                result = Err(err);
            }
        }

        result
    }

    /// Notify every driver that the tick is complete
    pub fn tick_all_drivers(&mut self) {
        for driver in &mut self.drivers {
            driver.tick();
        }
    }

    /// Last value written to a channel
    pub fn channel_value(&self, led_id: &str, channel_id: &str) -> Option<u8> {
        self.leds
            .iter()
            .find(|led| led.id == led_id)?
            .channels
            .iter()
            .find(|c| c.id == channel_id)
            .map(|c| c.value)
    }

    /// Ids of the registered leds
    pub fn leds(&self) -> impl Iterator<Item = &str> {
        self.leds.iter().map(|led| led.id.as_str())
    }

    pub fn dump(&self) {
        for led in &self.leds {
            let driver = self.drivers.get(led.driver).map_or("?", |d| d.name());
            log::info!("led {} (driver \"{}\"):", led.id, driver);
            for (i, channel) in led.channels.iter().enumerate() {
                log::info!("\tchannel[{}] {}", i, channel.id);
            }
        }
    }
}

impl OutputSink for Platform {
    fn apply_value(&mut self, led_id: &str, channel_id: &str, value: u8) -> Result<(), DriverError> {
        self.set_value(led_id, channel_id, value)
    }

    fn apply_default(&mut self, led_id: &str, value: u8) -> Result<(), DriverError> {
        self.set_led_value(led_id, value)
    }

    fn end_of_tick(&mut self) {
        self.tick_all_drivers();
    }
}
