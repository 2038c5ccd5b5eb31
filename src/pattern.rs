//! Pattern definitions and compiled patterns
//!
//! A [`PatternDefinition`] is the raw description handed over by a
//! configuration front end. The [`compiler`](crate::compiler) turns it into a
//! [`Pattern`]: an immutable set of per-channel value arrays, one byte per
//! granularity tick, which the player reads without any interpolation.

use alloc::string::String;
use alloc::vec::Vec;

use crate::sink::OutputSink;
use crate::transition::FIRST_TRANSITION_ID;

/// Maximum number of channels (and thus of leds) per pattern
pub const MAX_CHANNELS_PER_PATTERN: usize = 20;

/// Repetitions value meaning "loop until superseded"
pub const INFINITE: u32 = 0;

/// Content of a frame: a literal value or a transition id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameValue {
    Literal(u8),
    Transition(u16),
}

impl FrameValue {
    /// Decode a raw frame value, transitions start at [`FIRST_TRANSITION_ID`]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_raw(value: u16) -> Self {
        if value < FIRST_TRANSITION_ID {
            Self::Literal(value as u8)
        } else {
            Self::Transition(value)
        }
    }

    pub const fn to_raw(self) -> u16 {
        match self {
            Self::Literal(value) => value as u16,
            Self::Transition(id) => id,
        }
    }
}

/// One step of a channel timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub value: FrameValue,
    /// Duration in milliseconds, must be a multiple of the granularity
    pub duration: u32,
}

impl Frame {
    pub const fn new(value: u16, duration: u32) -> Self {
        Self {
            value: FrameValue::from_raw(value),
            duration,
        }
    }

    pub const fn literal(value: u8, duration: u32) -> Self {
        Self {
            value: FrameValue::Literal(value),
            duration,
        }
    }

    pub const fn transition(id: u16, duration: u32) -> Self {
        Self {
            value: FrameValue::Transition(id),
            duration,
        }
    }

    pub const fn is_transition(&self) -> bool {
        matches!(self.value, FrameValue::Transition(_))
    }

    /// Literal value of the frame, if it isn't a transition
    pub const fn literal_value(&self) -> Option<u8> {
        match self.value {
            FrameValue::Literal(value) => Some(value),
            FrameValue::Transition(_) => None,
        }
    }
}

/// Raw timeline of one led channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDefinition {
    led_id: String,
    channel_id: String,
    frames: Vec<Frame>,
}

impl ChannelDefinition {
    pub fn new(led_id: &str, channel_id: &str) -> Self {
        Self {
            led_id: led_id.into(),
            channel_id: channel_id.into(),
            frames: Vec::new(),
        }
    }

    /// Append a raw `(value_or_transition_id, duration)` pair
    #[must_use]
    pub fn with_frame(mut self, value: u16, duration: u32) -> Self {
        self.frames.push(Frame::new(value, duration));
        self
    }

    /// Append a literal value held for `duration` ms
    #[must_use]
    pub fn literal(mut self, value: u8, duration: u32) -> Self {
        self.frames.push(Frame::literal(value, duration));
        self
    }

    /// Append a transition lasting `duration` ms
    #[must_use]
    pub fn transition(mut self, id: u16, duration: u32) -> Self {
        self.frames.push(Frame::transition(id, duration));
        self
    }

    pub fn led_id(&self) -> &str {
        &self.led_id
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Raw description of a pattern, as read from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDefinition {
    pub name: String,
    pub channels: Vec<ChannelDefinition>,
    pub default_value: u8,
    /// Number of plays, [`INFINITE`] to loop forever
    pub repetitions: u32,
    /// Leading window in ms, skipped when looping
    pub intro: u32,
    /// Trailing window in ms, skipped on intermediate loops
    pub outro: u32,
}

impl PatternDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
            default_value: 0,
            repetitions: 1,
            intro: 0,
            outro: 0,
        }
    }

    #[must_use]
    pub fn with_channel(mut self, channel: ChannelDefinition) -> Self {
        self.channels.push(channel);
        self
    }

    #[must_use]
    pub fn with_default_value(mut self, default_value: u8) -> Self {
        self.default_value = default_value;
        self
    }

    #[must_use]
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    #[must_use]
    pub fn with_intro(mut self, intro: u32) -> Self {
        self.intro = intro;
        self
    }

    #[must_use]
    pub fn with_outro(mut self, outro: u32) -> Self {
        self.outro = outro;
        self
    }
}

/// Compiled channel of a pattern
#[derive(Debug, Clone)]
pub struct PatternChannel {
    pub(crate) led_id: String,
    pub(crate) channel_id: String,
    pub(crate) frames: Vec<Frame>,
    /// Own duration in ms, before padding to the pattern's duration
    pub(crate) duration: u32,
    /// One value per tick, over the whole pattern duration
    pub(crate) values: Vec<u8>,
}

impl PatternChannel {
    pub fn led_id(&self) -> &str {
        &self.led_id
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub const fn duration(&self) -> u32 {
        self.duration
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn value_at(&self, cursor: usize) -> Option<u8> {
        self.values.get(cursor).copied()
    }
}

/// Compiled, immutable pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    pub(crate) name: String,
    pub(crate) channels: Vec<PatternChannel>,
    /// Distinct leds with at least one channel driven by the pattern
    pub(crate) leds: Vec<String>,
    pub(crate) default_value: u8,
    pub(crate) repetitions: u32,
    pub(crate) intro: u32,
    pub(crate) outro: u32,
    /// Max of the channel durations, in ms
    pub(crate) total_duration: u32,
    pub(crate) granularity: u32,
}

impl Pattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channels(&self) -> &[PatternChannel] {
        &self.channels
    }

    pub fn leds(&self) -> &[String] {
        &self.leds
    }

    pub const fn default_value(&self) -> u8 {
        self.default_value
    }

    pub const fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub const fn intro(&self) -> u32 {
        self.intro
    }

    pub const fn outro(&self) -> u32 {
        self.outro
    }

    pub const fn total_duration(&self) -> u32 {
        self.total_duration
    }

    /// Granularity the pattern was compiled with, in ms
    pub const fn granularity(&self) -> u32 {
        self.granularity
    }

    /// Length of every channel's value array
    pub const fn total_ticks(&self) -> usize {
        (self.total_duration / self.granularity) as usize
    }

    pub const fn intro_ticks(&self) -> usize {
        (self.intro / self.granularity) as usize
    }

    pub const fn outro_ticks(&self) -> usize {
        (self.outro / self.granularity) as usize
    }

    pub fn contains_led(&self, led_id: &str) -> bool {
        self.leds.iter().any(|led| led == led_id)
    }

    /// Two patterns intersect if they share at least one led, even if they
    /// drive different channels of it
    pub fn intersects(&self, other: &Pattern) -> bool {
        self.leds.iter().any(|led| other.contains_led(led))
    }

    /// Two patterns have the same support if they drive exactly the same leds
    pub fn has_same_support(&self, other: &Pattern) -> bool {
        self.leds.iter().all(|led| other.contains_led(led))
            && other.leds.iter().all(|led| self.contains_led(led))
    }

    /// Write the default value on every channel of every led of the pattern
    pub fn apply_default<S: OutputSink + ?Sized>(&self, sink: &mut S) {
        for led in &self.leds {
            if let Err(err) = sink.apply_default(led, self.default_value) {
                log::warn!("apply_default({}, {}): {}", led, self.default_value, err);
            }
        }
    }

    /// Write the values of tick `cursor` on every channel
    ///
    /// Failures are logged and skipped, the other channels are still written.
    pub fn apply_values<S: OutputSink + ?Sized>(&self, cursor: usize, sink: &mut S) {
        for channel in &self.channels {
            let Some(value) = channel.value_at(cursor) else {
                log::debug!("{}: no value at tick {}", self.name, cursor);
                continue;
            };
            if let Err(err) = sink.apply_value(&channel.led_id, &channel.channel_id, value) {
                log::warn!(
                    "apply_value({}, {}, {}): {}",
                    channel.led_id,
                    channel.channel_id,
                    value,
                    err
                );
            }
        }
    }

    /// Write 0 on every channel of the pattern
    pub fn switch_off<S: OutputSink + ?Sized>(&self, sink: &mut S) {
        for channel in &self.channels {
            if let Err(err) = sink.apply_value(&channel.led_id, &channel.channel_id, 0) {
                log::warn!(
                    "apply_value({}, {}, 0): {}",
                    channel.led_id,
                    channel.channel_id,
                    err
                );
            }
        }
    }

    /// Log the pattern's parameters
    pub fn dump(&self) {
        log::info!("\t{}:", self.name);
        log::info!("\t\tnb_channels = {}", self.channels.len());
        log::info!("\t\trepetitions = {}", self.repetitions);
        log::info!("\t\tdefault_value = {}", self.default_value);
        log::info!("\t\ttotal_duration = {}", self.total_duration);
        log::info!("\t\tintro = {}", self.intro);
        log::info!("\t\toutro = {}", self.outro);
        for (i, channel) in self.channels.iter().enumerate() {
            log::debug!(
                "\t\tchannel[{}] {}_{} = {:?}",
                i,
                channel.led_id,
                channel.channel_id,
                channel.values
            );
        }
    }
}
