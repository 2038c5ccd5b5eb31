//! Live playback instance of a pattern
//!
//! A stream only holds a cursor into the pattern's precomputed values. It
//! may keep the stream it interrupted as `previous`, to be resumed when it
//! finishes; the previous stream never has a previous of its own.

use alloc::boxed::Box;
use alloc::rc::Rc;

use crate::pattern::Pattern;

/// Outcome of advancing a stream by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Playing,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Stream {
    pattern: Rc<Pattern>,
    /// Index in the value arrays, in ticks
    cursor: usize,
    repetition: u32,
    previous: Option<Box<Stream>>,
}

impl Stream {
    /// Create a stream at the start of `pattern`
    ///
    /// The previous stream, if any, is detached from its own previous.
    pub fn new(pattern: Rc<Pattern>, previous: Option<Stream>) -> Self {
        Self {
            pattern,
            cursor: 0,
            repetition: 0,
            previous: previous.map(|stream| Box::new(stream.detached())),
        }
    }

    pub fn pattern(&self) -> &Rc<Pattern> {
        &self.pattern
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of completed plays
    pub const fn repetition(&self) -> u32 {
        self.repetition
    }

    pub fn previous(&self) -> Option<&Stream> {
        self.previous.as_deref()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Take the interrupted stream out of this one
    pub fn take_previous(&mut self) -> Option<Stream> {
        self.previous.take().map(|stream| *stream)
    }

    /// Drop the link to the previous stream
    #[must_use]
    pub fn detached(mut self) -> Self {
        self.previous = None;
        self
    }

    /// Move the cursor back right after the intro
    pub fn rewind(&mut self) {
        self.cursor = self.pattern.intro_ticks();
    }

    /// Advance the cursor by one tick
    ///
    /// The outro is only played on the last repetition, or on every loop
    /// for infinite patterns. While inside the outro of such a pass the
    /// stream keeps going without touching its repetition count.
    pub fn advance(&mut self) -> StreamState {
        self.cursor += 1;

        let total = self.pattern.total_ticks();
        let outro = self.pattern.outro_ticks();
        if self.cursor < total.saturating_sub(outro) {
            return StreamState::Playing;
        }

        let repetitions = self.pattern.repetitions();
        let intermediate = repetitions
            .checked_sub(1)
            .is_some_and(|last| self.repetition < last);
        if outro != 0 && !intermediate && self.cursor != total {
            return StreamState::Playing;
        }

        self.repetition = self.repetition.saturating_add(1);
        if repetitions != 0 && self.repetition == repetitions {
            return StreamState::Finished;
        }
        self.rewind();

        StreamState::Playing
    }
}
