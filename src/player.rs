//! Playback scheduler
//!
//! Holds the streams currently playing. Active streams never share a led;
//! a new pattern either plays alongside them, replaces the one it overlaps
//! (which must drive exactly the same leds), or pauses it until it ends.

use alloc::vec::Vec;
use core::mem;

use crate::error::PlayerError;
use crate::library::PatternResolver;
use crate::sink::OutputSink;
use crate::stream::{Stream, StreamState};

#[derive(Debug, Default)]
pub struct Player {
    streams: Vec<Stream>,
    playing: bool,
}

impl Player {
    pub const fn new() -> Self {
        Self {
            streams: Vec::new(),
            playing: false,
        }
    }

    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Active streams, in insertion order
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    /// Start playing the pattern `name`
    ///
    /// With `resume`, the stream interrupted by the new pattern is kept and
    /// played again once the new one is finished. Only one interrupted
    /// stream is kept.
    ///
    /// Returns whether the player is playing. On error, the active streams
    /// are left untouched.
    pub fn set_pattern<R, S>(
        &mut self,
        patterns: &R,
        name: &str,
        resume: bool,
        sink: &mut S,
    ) -> Result<bool, PlayerError>
    where
        R: PatternResolver + ?Sized,
        S: OutputSink + ?Sized,
    {
        log::debug!("set_pattern({}, {})", name, resume);

        let pattern = patterns
            .resolve_pattern(name)
            .ok_or_else(|| PlayerError::NotFound(name.into()))?;

        // already playing, nothing to do
        if self.streams.iter().any(|stream| stream.pattern().name() == name) {
            return Ok(self.playing);
        }

        let Some(index) = self
            .streams
            .iter()
            .position(|stream| pattern.intersects(stream.pattern()))
        else {
            pattern.apply_default(sink);
            self.streams.push(Stream::new(pattern, None));
            self.start();
            return Ok(true);
        };

        let active = self.streams[index].pattern();
        if !pattern.has_same_support(active) {
            let err = PlayerError::Conflict {
                active: active.name().into(),
                requested: name.into(),
            };
            log::error!("{}, this is not supported", err);
            return Err(err);
        }

        pattern.apply_default(sink);
        if !resume {
            // the interrupted stream, if any, goes away with the old one
            self.streams[index] = Stream::new(pattern, None);
        } else if self.streams[index].has_previous() {
            // keep a single level: the old stream replaces the previous one
            let old = mem::replace(&mut self.streams[index], Stream::new(pattern.clone(), None));
            self.streams[index] = Stream::new(pattern, Some(old));
        } else {
            let old = self.streams.remove(index);
            self.streams.push(Stream::new(pattern, Some(old)));
        }
        self.start();

        Ok(true)
    }

    /// Play one tick of every active stream
    ///
    /// Returns whether the player is still playing; when it isn't, the
    /// periodic tick can be stopped.
    pub fn update<S: OutputSink + ?Sized>(&mut self, sink: &mut S) -> bool {
        let streams = mem::take(&mut self.streams);
        let mut finished = Vec::new();
        let mut resumed = Vec::new();

        for mut stream in streams {
            stream.pattern().apply_values(stream.cursor(), sink);

            match stream.advance() {
                StreamState::Playing => self.streams.push(stream),
                StreamState::Finished => {
                    log::debug!("pattern {} finished", stream.pattern().name());
                    if let Some(mut previous) = stream.take_previous() {
                        log::debug!("resuming pattern {}", previous.pattern().name());
                        previous.rewind();
                        previous.pattern().apply_default(sink);
                        resumed.push(previous);
                    }
                    finished.push(stream);
                }
            }
        }
        self.streams.append(&mut resumed);
        drop(finished);

        if self.streams.is_empty() && self.playing {
            self.playing = false;
            log::info!("player stopped");
        }

        sink.end_of_tick();

        self.playing
    }

    /// Drop every stream, interrupted ones included
    pub fn cleanup(&mut self) {
        log::debug!("player cleanup");
        self.streams.clear();
        self.playing = false;
    }

    fn start(&mut self) {
        if !self.playing {
            self.playing = true;
            log::info!("player started");
        }
    }
}
