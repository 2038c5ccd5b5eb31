//! RGB pixel driver
//!
//! Composes the channels of each led into one pixel of an `RGB8` frame, and
//! writes the whole frame to an [`OutputDriver`] at the end of every tick in
//! which something changed. Channels are either the red, green and blue
//! components, or hue, saturation and value converted to RGB.
//!
//! The channel parameters are the index of the pixel in the strip.

use alloc::vec;
use alloc::vec::Vec;

use super::{ChannelAddress, LedDriver};
use crate::OutputDriver;
use crate::color::{Hsv, Rgb, hsv2rgb};
use crate::error::DriverError;

const DRIVER_NAME: &str = "pixel";

const CHANNEL_NAME_RED: &str = "red";
const CHANNEL_NAME_GREEN: &str = "green";
const CHANNEL_NAME_BLUE: &str = "blue";
const CHANNEL_NAME_HUE: &str = "hue";
const CHANNEL_NAME_SATURATION: &str = "saturation";
const CHANNEL_NAME_VALUE: &str = "value";

/// Component of a pixel a channel controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelChannel {
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    Value,
}

impl PixelChannel {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            CHANNEL_NAME_RED => Some(Self::Red),
            CHANNEL_NAME_GREEN => Some(Self::Green),
            CHANNEL_NAME_BLUE => Some(Self::Blue),
            CHANNEL_NAME_HUE => Some(Self::Hue),
            CHANNEL_NAME_SATURATION => Some(Self::Saturation),
            CHANNEL_NAME_VALUE => Some(Self::Value),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => CHANNEL_NAME_RED,
            Self::Green => CHANNEL_NAME_GREEN,
            Self::Blue => CHANNEL_NAME_BLUE,
            Self::Hue => CHANNEL_NAME_HUE,
            Self::Saturation => CHANNEL_NAME_SATURATION,
            Self::Value => CHANNEL_NAME_VALUE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PixelSlot {
    pixel: usize,
    channel: PixelChannel,
}

/// Driver mapping led channels onto the pixels of a strip
pub struct PixelDriver<O: OutputDriver> {
    output: O,
    frame: Vec<Rgb>,
    hsv: Vec<Hsv>,
    slots: Vec<PixelSlot>,
    dirty: bool,
}

impl<O: OutputDriver> PixelDriver<O> {
    /// Create a driver for a strip of `pixels` leds
    pub fn new(output: O, pixels: usize) -> Self {
        Self {
            output,
            frame: vec![Rgb::default(); pixels],
            hsv: vec![
                Hsv {
                    hue: 0,
                    sat: 0,
                    val: 0
                };
                pixels
            ],
            slots: Vec::new(),
            dirty: false,
        }
    }

    /// Current content of the frame
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: OutputDriver> LedDriver for PixelDriver<O> {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn channel_new(
        &mut self,
        led_id: &str,
        channel_id: &str,
        parameters: Option<&str>,
    ) -> Result<ChannelAddress, DriverError> {
        let invalid = || DriverError::InvalidParameters {
            led: led_id.into(),
            channel: channel_id.into(),
        };
        let channel = PixelChannel::parse_from_str(channel_id).ok_or_else(invalid)?;
        let pixel = parameters
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|pixel| *pixel < self.frame.len())
            .ok_or_else(invalid)?;

        self.slots.push(PixelSlot { pixel, channel });
        Ok(self.slots.len() - 1)
    }

    fn set_value(&mut self, address: ChannelAddress, value: u8) -> Result<(), DriverError> {
        let slot = *self.slots.get(address).ok_or(DriverError::Write {
            driver: DRIVER_NAME,
            reason: "no such channel",
        })?;
        let (Some(rgb), Some(hsv)) = (self.frame.get_mut(slot.pixel), self.hsv.get_mut(slot.pixel))
        else {
            return Err(DriverError::Write {
                driver: DRIVER_NAME,
                reason: "pixel out of range",
            });
        };

        match slot.channel {
            PixelChannel::Red => rgb.r = value,
            PixelChannel::Green => rgb.g = value,
            PixelChannel::Blue => rgb.b = value,
            PixelChannel::Hue => hsv.hue = value,
            PixelChannel::Saturation => hsv.sat = value,
            PixelChannel::Value => hsv.val = value,
        }
        if matches!(
            slot.channel,
            PixelChannel::Hue | PixelChannel::Saturation | PixelChannel::Value
        ) {
            *rgb = hsv2rgb(*hsv);
        }
        self.dirty = true;

        Ok(())
    }

    fn tick(&mut self) {
        if self.dirty {
            self.output.write(&self.frame);
            self.dirty = false;
        }
    }
}
