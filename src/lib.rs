#![no_std]

extern crate alloc;

pub mod channel;
pub mod color;
pub mod command;
pub mod compiler;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod library;
#[cfg(feature = "esp32-log")]
pub mod logger;
pub mod pattern;
pub mod platform;
pub mod player;
pub mod scheduler;
pub mod sink;
pub mod stream;
pub mod transition;

pub use command::{Command, CommandChannel, CommandReceiver, CommandSender, ConfigSection};
pub use compiler::PatternCompiler;
pub use config::GlobalConfig;
pub use driver::{LedDriver, MemoryDriver, PixelChannel, PixelDriver};
pub use engine::Engine;
pub use error::{CompileError, DriverError, EngineError, PlayerError, RegistryError};
pub use library::{PatternLibrary, PatternResolver};
pub use pattern::{
    ChannelDefinition, Frame, FrameValue, Pattern, PatternChannel, PatternDefinition,
};
pub use platform::Platform;
pub use player::Player;
pub use scheduler::{TickResult, TickScheduler};
pub use sink::OutputSink;
pub use stream::{Stream, StreamState};
pub use transition::{Transition, TransitionFn, TransitionRegistry};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED strip output
///
/// Implement this trait to support different hardware platforms.
/// [`PixelDriver`] is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
