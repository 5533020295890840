// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Event: hashable event-key value types.
//!
//! An [`EventKey`] identifies one triggerable event on an input source: either
//! a discrete control trigger ([`ControlEvent`]) or a gesture described by a
//! [`GestureDescriptor`]. Keys are plain values with structural equality and
//! hashing, so they can index action tables directly.
//!
//! ## Overview
//!
//! - [`ControlEvent`]: an opaque identifier of one discrete trigger kind on a
//!   control (press, release, value changed, ...). The meaning of each id is
//!   defined by the host toolkit; a few conventional ids are provided for
//!   simulation sources and tests.
//! - [`GestureDescriptor`]: a gesture kind plus its trigger-state set and
//!   kind-specific parameters (tap count, touch count, swipe directions,
//!   minimum press duration, screen edges). Descriptors are built through
//!   per-kind constructors that validate their parameters up front, so a
//!   contradictory descriptor fails at construction time rather than at
//!   dispatch time.
//!
//! ## Minimal example
//!
//! ```
//! use trellis_event::{ControlEvent, EventKey, GestureDescriptor};
//!
//! let press = EventKey::Control(ControlEvent::PRIMARY);
//! let double_tap = EventKey::Gesture(GestureDescriptor::tap(2, 1).unwrap());
//!
//! // Keys are structural values: equal iff every field matches.
//! assert_eq!(press, EventKey::Control(ControlEvent::PRIMARY));
//! assert_ne!(double_tap, EventKey::Gesture(GestureDescriptor::tap(1, 1).unwrap()));
//! ```
//!
//! This crate is `no_std` and allocation-free.

#![no_std]

mod gesture;

pub use gesture::{
    DescriptorError, Edges, GestureDescriptor, GestureKind, GesturePhase, GesturePhases,
    SwipeDirections,
};

use core::fmt;

/// An opaque identifier of one discrete trigger kind on a control.
///
/// The library never interprets the id; it only compares and hashes it. Hosts
/// map their toolkit's native control-event constants onto ids of their
/// choosing. The associated constants below are the conventional ids used by
/// the simulation sources and the demos.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlEvent(u32);

impl ControlEvent {
    /// The primary activation trigger (e.g. touch-up-inside, click).
    pub const PRIMARY: Self = Self(1);
    /// The control's value changed (sliders, switches, steppers).
    pub const VALUE_CHANGED: Self = Self(2);
    /// Editing began on a text-entry control.
    pub const EDITING_BEGAN: Self = Self(3);
    /// Editing ended on a text-entry control.
    pub const EDITING_ENDED: Self = Self(4);

    /// Creates a control event from a host-defined id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying host-defined id.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ControlEvent").field(&self.0).finish()
    }
}

/// A hashable descriptor of one triggerable event kind on an input source.
///
/// Two keys are equal iff all of their fields match; a single-tap key and a
/// double-tap key are distinct table entries, as are two keys that differ only
/// in their trigger-state sets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// A discrete control trigger.
    Control(ControlEvent),
    /// A gesture, described by kind, trigger states, and parameters.
    Gesture(GestureDescriptor),
}

impl EventKey {
    /// Returns the gesture descriptor if this key describes a gesture.
    #[must_use]
    pub fn gesture(&self) -> Option<&GestureDescriptor> {
        match self {
            Self::Gesture(descriptor) => Some(descriptor),
            Self::Control(_) => None,
        }
    }

    /// Returns the control event if this key describes a discrete trigger.
    #[must_use]
    pub fn control(&self) -> Option<ControlEvent> {
        match self {
            Self::Control(event) => Some(*event),
            Self::Gesture(_) => None,
        }
    }
}

impl From<ControlEvent> for EventKey {
    fn from(event: ControlEvent) -> Self {
        Self::Control(event)
    }
}

impl From<GestureDescriptor> for EventKey {
    fn from(descriptor: GestureDescriptor) -> Self {
        Self::Gesture(descriptor)
    }
}
