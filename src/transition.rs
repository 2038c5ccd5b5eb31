//! Transition function registry
//!
//! A transition maps a step index inside a frame onto a value between the
//! literal values surrounding that frame. Frame values below
//! [`FIRST_TRANSITION_ID`] are literal channel values, so transitions are
//! numbered from there upwards in registration order.

use alloc::string::String;
use core::f32::consts::PI;

use heapless::Vec;

use crate::error::{CompileError, RegistryError};

/// Maximum number of transitions, built-ins included
pub const TRANSITION_MAX: usize = 10;

/// Id of the first registered transition
pub const FIRST_TRANSITION_ID: u16 = 0x100;

/// Name of the built-in linear transition
pub const RAMP: &str = "ramp";

/// Name of the built-in ease in/out transition
pub const COSINE: &str = "cosine";

/// Computes the value of step `step` out of `nb_steps`, going from `start`
/// to `end`. Must return a value in `[start, end]`.
pub type TransitionFn = fn(nb_steps: u32, step: u32, start: u8, end: u8) -> u8;

/// Clip an integer into the channel value range
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn clip_value(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > u8::MAX as i32 {
        u8::MAX
    } else {
        value as u8
    }
}

/// Clip a float into `[0, 1]`
pub fn clip_unit(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Clip `t` into `[0, 1]` and map it linearly onto `[start, end]`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn map_to(t: f32, start: u8, end: u8) -> u8 {
    let start = f32::from(start);
    let end = f32::from(end);

    (clip_unit(t) * (end - start) + start) as u8
}

#[allow(clippy::cast_precision_loss)]
fn ramp(nb_steps: u32, step: u32, start: u8, end: u8) -> u8 {
    let t = step as f32 / nb_steps as f32;

    map_to(t, start, end)
}

#[allow(clippy::cast_precision_loss)]
fn cosine(nb_steps: u32, step: u32, start: u8, end: u8) -> u8 {
    // go back to [-PI, 0]
    let angle = step as f32 * PI / nb_steps as f32 - PI;
    let t = (libm::cosf(angle) + 1.0) / 2.0;

    map_to(t, start, end)
}

/// A named interpolation function
#[derive(Debug, Clone)]
pub struct Transition {
    name: String,
    id: u16,
    compute: TransitionFn,
}

impl Transition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn id(&self) -> u16 {
        self.id
    }

    /// Compute the value of one step of the transition
    pub fn compute(&self, nb_steps: u32, step: u32, start: u8, end: u8) -> u8 {
        (self.compute)(nb_steps, step, start, end)
    }
}

/// Append-only table of transitions
///
/// Owned by whoever compiles patterns; there is no process-wide table, so
/// independent registries can coexist.
#[derive(Debug, Clone)]
pub struct TransitionRegistry {
    transitions: Vec<Transition, TRANSITION_MAX>,
}

impl TransitionRegistry {
    /// Create a registry holding the `ramp` and `cosine` built-ins
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, compute) in [(RAMP, ramp as TransitionFn), (COSINE, cosine as TransitionFn)] {
            if let Err(err) = registry.register(name, compute) {
                log::warn!("transition_register({}): {}", name, err);
            }
        }
        registry
    }

    /// Create a registry without any transition
    pub const fn empty() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Register a transition and return its id
    pub fn register(&mut self, name: &str, compute: TransitionFn) -> Result<u16, RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidName);
        }
        if self.id_of(name).is_some() {
            return Err(RegistryError::Duplicate(name.into()));
        }
        let id = self
            .transitions
            .last()
            .map_or(FIRST_TRANSITION_ID, |last| last.id + 1);

        self.transitions
            .push(Transition {
                name: name.into(),
                id,
                compute,
            })
            .map_err(|_| RegistryError::Full)?;
        log::debug!("registered transition {} as {:#x}", name, id);

        Ok(id)
    }

    pub fn get(&self, id: u16) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    /// Id of the transition named `name`, for configuration front ends
    pub fn id_of(&self, name: &str) -> Option<u16> {
        self.transitions
            .iter()
            .find(|t| t.name == name)
            .map(Transition::id)
    }

    /// Compute one step of transition `id`
    ///
    /// An unresolved id is a configuration error, never a silent zero.
    pub fn compute(
        &self,
        id: u16,
        nb_steps: u32,
        step: u32,
        start: u8,
        end: u8,
    ) -> Result<u8, CompileError> {
        self.get(id)
            .map(|t| t.compute(nb_steps, step, start, end))
            .ok_or(CompileError::UnknownTransition(id))
    }

    /// Iterate over the transitions in id order
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
