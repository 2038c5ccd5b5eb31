//! Pattern compiler
//!
//! Expands the frames of every channel into one value per granularity tick.
//! Literal frames repeat their value, transition frames interpolate between
//! the literal value before them and the one after them, wrapping to the
//! first frame when the transition is the last one.

use alloc::string::String;
use alloc::vec::Vec;
use core::iter::repeat_n;

use crate::error::CompileError;
use crate::pattern::{
    ChannelDefinition, FrameValue, MAX_CHANNELS_PER_PATTERN, Pattern, PatternChannel,
    PatternDefinition,
};
use crate::transition::TransitionRegistry;

/// Compiles pattern definitions at a given granularity
#[derive(Debug, Clone, Copy)]
pub struct PatternCompiler<'a> {
    transitions: &'a TransitionRegistry,
    /// Milliseconds per tick
    granularity: u32,
}

impl<'a> PatternCompiler<'a> {
    pub const fn new(
        transitions: &'a TransitionRegistry,
        granularity: u32,
    ) -> Result<Self, CompileError> {
        if granularity == 0 {
            return Err(CompileError::ZeroGranularity);
        }
        Ok(Self {
            transitions,
            granularity,
        })
    }

    pub const fn granularity(&self) -> u32 {
        self.granularity
    }

    /// Compile a pattern definition
    pub fn compile(&self, definition: &PatternDefinition) -> Result<Pattern, CompileError> {
        let name = definition.name.as_str();
        log::debug!("compiling pattern {}", name);

        if definition.channels.len() > MAX_CHANNELS_PER_PATTERN {
            return Err(CompileError::TooManyChannels {
                pattern: name.into(),
                max: MAX_CHANNELS_PER_PATTERN,
            });
        }

        let mut durations = Vec::with_capacity(definition.channels.len());
        for channel in &definition.channels {
            durations.push(self.channel_duration(name, channel)?);
        }
        let total_duration = durations.iter().copied().max().unwrap_or(0);
        for (channel, duration) in definition.channels.iter().zip(&durations) {
            if *duration != total_duration {
                log::warn!(
                    "channel {}_{} of pattern {} lasts {} ms instead of {} ms, completed with zeroes",
                    channel.led_id(),
                    channel.channel_id(),
                    name,
                    duration,
                    total_duration
                );
            }
        }

        if definition.intro > total_duration {
            return Err(CompileError::IntroTooLong {
                pattern: name.into(),
                intro: definition.intro,
                duration: total_duration,
            });
        }
        if definition.outro > total_duration {
            return Err(CompileError::OutroTooLong {
                pattern: name.into(),
                outro: definition.outro,
                duration: total_duration,
            });
        }
        if total_duration == 0 {
            return Err(CompileError::EmptyPattern(name.into()));
        }

        let total_ticks = (total_duration / self.granularity) as usize;
        let mut channels = Vec::with_capacity(definition.channels.len());
        let mut leds: Vec<String> = Vec::new();
        for (channel, duration) in definition.channels.iter().zip(durations) {
            let values = self.channel_values(name, channel, total_ticks)?;
            if !leds.iter().any(|led| led == channel.led_id()) {
                leds.push(channel.led_id().into());
            }
            channels.push(PatternChannel {
                led_id: channel.led_id().into(),
                channel_id: channel.channel_id().into(),
                frames: channel.frames().to_vec(),
                duration,
                values,
            });
        }

        Ok(Pattern {
            name: name.into(),
            channels,
            leds,
            default_value: definition.default_value,
            repetitions: definition.repetitions,
            intro: definition.intro,
            outro: definition.outro,
            total_duration,
            granularity: self.granularity,
        })
    }

    /// Sum of the frame durations, each must be a multiple of granularity
    fn channel_duration(&self, pattern: &str, channel: &ChannelDefinition) -> Result<u32, CompileError> {
        let mut duration: u32 = 0;
        for (frame_index, frame) in channel.frames().iter().enumerate() {
            if frame.duration % self.granularity != 0 {
                return Err(CompileError::InvalidFrameDuration {
                    pattern: pattern.into(),
                    led: channel.led_id().into(),
                    channel: channel.channel_id().into(),
                    frame: frame_index,
                });
            }
            duration = duration.saturating_add(frame.duration);
        }

        Ok(duration)
    }

    /// Expand the frames of a channel, padded with zeroes up to `total_ticks`
    fn channel_values(
        &self,
        pattern: &str,
        channel: &ChannelDefinition,
        total_ticks: usize,
    ) -> Result<Vec<u8>, CompileError> {
        let frames = channel.frames();
        if frames.first().is_some_and(|frame| frame.is_transition()) {
            return Err(CompileError::StartsWithTransition {
                pattern: pattern.into(),
                led: channel.led_id().into(),
                channel: channel.channel_id().into(),
            });
        }

        let mut values = Vec::with_capacity(total_ticks);
        for (index, frame) in frames.iter().enumerate() {
            let nb_steps = frame.duration / self.granularity;
            match frame.value {
                FrameValue::Literal(value) => values.extend(repeat_n(value, nb_steps as usize)),
                FrameValue::Transition(id) => {
                    let transition = self
                        .transitions
                        .get(id)
                        .ok_or(CompileError::UnknownTransition(id))?;
                    let adjacent = || CompileError::AdjacentTransitions {
                        pattern: pattern.into(),
                        led: channel.led_id().into(),
                        channel: channel.channel_id().into(),
                        frame: index,
                    };
                    let start = frames[index - 1].literal_value().ok_or_else(adjacent)?;
                    let end = frames[(index + 1) % frames.len()]
                        .literal_value()
                        .ok_or_else(adjacent)?;
                    values.extend((0..nb_steps).map(|step| transition.compute(nb_steps, step, start, end)));
                }
            }
        }
        values.resize(total_ticks, 0);

        Ok(values)
    }
}
