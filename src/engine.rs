//! Engine - the main orchestrator
//!
//! Owns the configuration, the compiled patterns, the led platform and the
//! player, and executes the commands sent by clients.

use crate::command::{Command, CommandReceiver, ConfigSection};
use crate::config::GlobalConfig;
use crate::error::EngineError;
use crate::library::PatternLibrary;
use crate::platform::Platform;
use crate::player::Player;

pub struct Engine<'a, const COMMAND_CHANNEL_SIZE: usize> {
    // External dependencies and configuration
    commands: CommandReceiver<'a, COMMAND_CHANNEL_SIZE>,
    config: GlobalConfig,
    patterns: PatternLibrary,

    // Internal state
    platform: Platform,
    player: Player,
    running: bool,
}

impl<'a, const COMMAND_CHANNEL_SIZE: usize> Engine<'a, COMMAND_CHANNEL_SIZE> {
    pub fn new(
        commands: CommandReceiver<'a, COMMAND_CHANNEL_SIZE>,
        config: GlobalConfig,
        patterns: PatternLibrary,
        platform: Platform,
    ) -> Self {
        Self {
            commands,
            config,
            patterns,
            platform,
            player: Player::new(),
            running: true,
        }
    }

    /// Play the startup pattern, or switch every led off if there is none
    ///
    /// Returns whether the player is playing.
    pub fn start(&mut self) -> bool {
        match self.config.startup_pattern.clone() {
            Some(pattern) => {
                if let Err(err) = self.set_pattern(&pattern, false) {
                    log::error!("startup pattern {}: {}", pattern, err);
                }
            }
            None => {
                if let Err(err) = self.platform.paint_it_black() {
                    log::warn!("paint_it_black: {}", err);
                }
                self.platform.tick_all_drivers();
            }
        }

        self.player.is_playing()
    }

    /// Execute every pending command (non-blocking)
    pub fn process_commands(&mut self) {
        while let Ok(command) = self.commands.try_receive() {
            if let Err(err) = self.execute(command) {
                log::error!("command failed: {}", err);
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<(), EngineError> {
        match command {
            Command::SetPattern { name, resume } => {
                self.set_pattern(&name, resume)?;
                log::debug!("current pattern set to {}", name);
            }
            Command::SetValue {
                led,
                channel,
                value,
            } => self.set_value(&led, &channel, value)?,
            Command::DumpConfig(section) => self.dump_config(section),
            Command::Quit => {
                log::info!("exit on user request");
                self.running = false;
            }
        }

        Ok(())
    }

    /// Start playing a pattern, see [`Player::set_pattern`]
    pub fn set_pattern(&mut self, name: &str, resume: bool) -> Result<bool, EngineError> {
        let playing = self
            .player
            .set_pattern(&self.patterns, name, resume, &mut self.platform)?;

        Ok(playing)
    }

    /// Set a channel directly, clamping `value` to 255
    pub fn set_value(&mut self, led: &str, channel: &str, value: u32) -> Result<(), EngineError> {
        let value = u8::try_from(value).unwrap_or_else(|_| {
            log::warn!("value {} above maximum {}", value, u8::MAX);
            u8::MAX
        });
        log::debug!("set_value({}, {}, {})", led, channel, value);
        self.platform.set_value(led, channel, value)?;

        Ok(())
    }

    /// Play one tick, returns whether the player is still playing
    pub fn update(&mut self) -> bool {
        self.player.update(&mut self.platform)
    }

    pub fn dump_config(&self, section: ConfigSection) {
        log::debug!("dump {} config", section.as_str());
        match section {
            ConfigSection::Global => self.config.dump(),
            ConfigSection::Platform => self.platform.dump(),
            ConfigSection::Patterns => self.patterns.dump(),
        }
    }

    /// Stop every stream and switch the leds off
    pub fn shutdown(&mut self) {
        self.player.cleanup();
        if let Err(err) = self.platform.paint_it_black() {
            log::warn!("paint_it_black: {}", err);
        }
        self.platform.tick_all_drivers();
        self.running = false;
    }

    pub const fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    /// False once a client asked the engine to quit
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn config(&self) -> &GlobalConfig {
        &self.config
    }

    pub const fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    pub const fn platform(&self) -> &Platform {
        &self.platform
    }

    pub const fn player(&self) -> &Player {
        &self.player
    }
}
