//! Tick scheduling
//!
//! Paces the engine at the configured granularity without async/await or
//! platform-specific timers. The caller sleeps between ticks, and stops
//! calling [`TickScheduler::tick`] periodically once it returns `None`, until
//! a new command arrives.

use embassy_time::{Duration, Instant};

use crate::engine::Engine;

/// Result of a tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Drives an [`Engine`] at its granularity.
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = TickScheduler::new(engine);
///
/// while scheduler.engine().is_running() {
///     let now = Instant::from_millis(get_current_time_ms());
///     match scheduler.tick(now) {
///         Some(result) => sleep_ms(result.sleep_duration.as_millis()),
///         None => wait_for_command(),
///     }
/// }
/// ```
pub struct TickScheduler<'a, const COMMAND_CHANNEL_SIZE: usize> {
    engine: Engine<'a, COMMAND_CHANNEL_SIZE>,
    next_tick: Instant,
    period: Duration,
    armed: bool,
}

impl<'a, const COMMAND_CHANNEL_SIZE: usize> TickScheduler<'a, COMMAND_CHANNEL_SIZE> {
    /// Create a scheduler ticking at the engine's granularity.
    pub fn new(engine: Engine<'a, COMMAND_CHANNEL_SIZE>) -> Self {
        let period = engine.config().granularity;
        Self {
            engine,
            next_tick: Instant::from_millis(0),
            period,
            armed: false,
        }
    }

    /// Process pending commands, then play one tick if the player is playing.
    ///
    /// Returns `None` when there is nothing to play: the periodic timer can
    /// be stopped.
    pub fn tick(&mut self, now: Instant) -> Option<TickResult> {
        self.engine.process_commands();
        if !self.engine.is_running() || !self.engine.is_playing() {
            self.disarm();
            return None;
        }
        if !self.armed {
            self.resume(now);
        }

        // Drift correction: if we've fallen too far behind, reset to now
        let max_drift = self.period.as_millis() * 2;
        if now.as_millis() > self.next_tick.as_millis() + max_drift {
            self.next_tick = now;
        }

        if !self.engine.update() {
            self.disarm();
            return None;
        }

        self.next_tick += self.period;
        let sleep_duration = if self.next_tick.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_tick.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        Some(TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
        })
    }

    /// Re-arm the timer, the next tick is due at `now`.
    pub fn resume(&mut self, now: Instant) {
        if !self.armed {
            log::info!("timer resumed");
        }
        self.next_tick = now;
        self.armed = true;
    }

    /// Whether the periodic timer should be running.
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    pub const fn engine(&self) -> &Engine<'a, COMMAND_CHANNEL_SIZE> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<'a, COMMAND_CHANNEL_SIZE> {
        &mut self.engine
    }

    fn disarm(&mut self) {
        if self.armed {
            log::info!("timer stopped");
        }
        self.armed = false;
    }
}
