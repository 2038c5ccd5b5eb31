use alloc::string::String;

use crate::channel::{Channel, Receiver, Sender};

const SECTION_NAME_GLOBAL: &str = "global";
const SECTION_NAME_PLATFORM: &str = "platform";
const SECTION_NAME_PATTERNS: &str = "patterns";

/// Part of the configuration to dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Global,
    Platform,
    Patterns,
}

impl ConfigSection {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            SECTION_NAME_GLOBAL => Some(Self::Global),
            SECTION_NAME_PLATFORM => Some(Self::Platform),
            SECTION_NAME_PATTERNS => Some(Self::Patterns),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => SECTION_NAME_GLOBAL,
            Self::Platform => SECTION_NAME_PLATFORM,
            Self::Patterns => SECTION_NAME_PATTERNS,
        }
    }
}

/// Requests a client can send to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play a pattern, resuming the interrupted one afterwards if `resume`
    SetPattern { name: String, resume: bool },
    /// Set a channel directly, values above 255 are clamped
    SetValue {
        led: String,
        channel: String,
        value: u32,
    },
    /// Log a part of the configuration
    DumpConfig(ConfigSection),
    /// Stop the engine
    Quit,
}

impl Command {
    pub fn set_pattern(name: &str, resume: bool) -> Self {
        Self::SetPattern {
            name: name.into(),
            resume,
        }
    }

    pub fn set_value(led: &str, channel: &str, value: u32) -> Self {
        Self::SetValue {
            led: led.into(),
            channel: channel.into(),
            value,
        }
    }
}

/// Type alias for command sender
pub type CommandSender<'a, const SIZE: usize> = Sender<'a, Command, SIZE>;

/// Type alias for command receiver
pub type CommandReceiver<'a, const SIZE: usize> = Receiver<'a, Command, SIZE>;

/// Type alias for the command channel
pub type CommandChannel<const SIZE: usize> = Channel<Command, SIZE>;
