//! Error taxonomy
//!
//! Configuration problems surface as [`CompileError`] while building the
//! pattern set, runtime requests fail with [`PlayerError`], and hardware
//! writes fail with [`DriverError`]. [`EngineError`] wraps all of them for
//! the command surface.

use alloc::string::String;

use thiserror::Error;

/// Errors raised while compiling a pattern set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("granularity must be a positive number of milliseconds")]
    ZeroGranularity,

    #[error("duration of frame {led}_{channel}[{frame}] in pattern {pattern} isn't a multiple of granularity")]
    InvalidFrameDuration {
        pattern: String,
        led: String,
        channel: String,
        frame: usize,
    },

    #[error("channel {led}_{channel} of pattern {pattern} can't start with a transition")]
    StartsWithTransition {
        pattern: String,
        led: String,
        channel: String,
    },

    #[error("transition frame {led}_{channel}[{frame}] in pattern {pattern} has no literal neighbour")]
    AdjacentTransitions {
        pattern: String,
        led: String,
        channel: String,
        frame: usize,
    },

    #[error("transition {0:#x} not found")]
    UnknownTransition(u16),

    #[error("intro time ({intro} ms) of pattern {pattern} is longer than its duration ({duration} ms)")]
    IntroTooLong {
        pattern: String,
        intro: u32,
        duration: u32,
    },

    #[error("outro time ({outro} ms) of pattern {pattern} is longer than its duration ({duration} ms)")]
    OutroTooLong {
        pattern: String,
        outro: u32,
        duration: u32,
    },

    #[error("pattern {0} has no values to play")]
    EmptyPattern(String),

    #[error("pattern {pattern} has more than {max} channels")]
    TooManyChannels { pattern: String, max: usize },

    #[error("pattern {0} is defined twice")]
    DuplicatePattern(String),
}

/// Errors raised by the transition registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid transition name")]
    InvalidName,

    #[error("transition {0} is already registered")]
    Duplicate(String),

    #[error("transition table is full")]
    Full,
}

/// Errors reported to the requester of a pattern change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("pattern {0} not found")]
    NotFound(String),

    /// The requested pattern shares some leds with an active one, but not all
    #[error("patterns {active} and {requested} have some leds in common, but not all")]
    Conflict { active: String, requested: String },
}

/// Errors raised by the led platform and its drivers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("no led named {0}")]
    UnknownLed(String),

    #[error("led {led} has no channel named {channel}")]
    UnknownChannel { led: String, channel: String },

    #[error("no driver named {0}")]
    UnknownDriver(String),

    #[error("led {0} already exists")]
    DuplicateLed(String),

    #[error("channel {led}_{channel} already exists")]
    DuplicateChannel { led: String, channel: String },

    #[error("{0} capacity exceeded")]
    CapacityExceeded(&'static str),

    #[error("invalid parameters for channel {led}_{channel}")]
    InvalidParameters { led: String, channel: String },

    #[error("driver {driver} failed to write: {reason}")]
    Write {
        driver: &'static str,
        reason: &'static str,
    },
}

/// Errors raised by the engine while executing client commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
