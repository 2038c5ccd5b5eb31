use alloc::string::String;

use embassy_time::Duration;

/// Default time between two ticks
pub const DEFAULT_GRANULARITY: Duration = Duration::from_millis(10);

/// Global configuration of the engine
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    /// Time between two ticks, every duration must be a multiple of it
    pub granularity: Duration,
    /// Pattern played when the engine starts, leds are switched off if none
    pub startup_pattern: Option<String>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            granularity: DEFAULT_GRANULARITY,
            startup_pattern: None,
        }
    }
}

impl GlobalConfig {
    #[must_use]
    pub fn with_granularity(mut self, granularity: Duration) -> Self {
        self.granularity = granularity;
        self
    }

    #[must_use]
    pub fn with_startup_pattern(mut self, pattern: &str) -> Self {
        self.startup_pattern = Some(pattern.into());
        self
    }

    /// Granularity in milliseconds
    pub fn granularity_ms(&self) -> u32 {
        u32::try_from(self.granularity.as_millis()).unwrap_or(u32::MAX)
    }

    pub fn dump(&self) {
        log::info!("granularity = {}", self.granularity_ms());
        log::info!("startup pattern = {:?}", self.startup_pattern);
    }
}
