// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture descriptors: kind, trigger states, and kind-specific parameters.

use core::time::Duration;

use thiserror::Error;

/// The recognized gesture families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// Discrete tap with a tap count and touch count.
    Tap,
    /// Press held for at least a minimum duration.
    LongPress,
    /// Directional swipe.
    Swipe,
    /// Continuous pan/drag.
    Pan,
    /// Two-finger pinch (scale).
    Pinch,
    /// Two-finger rotation.
    Rotation,
    /// Pan entering from a screen edge.
    EdgePan,
    /// Pointer hover without contact.
    Hover,
}

/// One lifecycle state of a gesture recognizer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// The recognizer has not yet recognized its gesture.
    Possible,
    /// A continuous gesture started.
    Began,
    /// A continuous gesture updated.
    Changed,
    /// The gesture completed (discrete gestures report only this phase).
    Ended,
    /// The gesture was cancelled by the system.
    Cancelled,
    /// The recognizer failed to match.
    Failed,
}

impl GesturePhase {
    /// Converts this phase into a single-element [`GesturePhases`] set.
    #[must_use]
    pub const fn into_set(self) -> GesturePhases {
        match self {
            Self::Possible => GesturePhases::POSSIBLE,
            Self::Began => GesturePhases::BEGAN,
            Self::Changed => GesturePhases::CHANGED,
            Self::Ended => GesturePhases::ENDED,
            Self::Cancelled => GesturePhases::CANCELLED,
            Self::Failed => GesturePhases::FAILED,
        }
    }
}

bitflags::bitflags! {
    /// A set of gesture lifecycle states.
    ///
    /// An empty set in a descriptor means "no filtering": the gesture triggers
    /// in every phase the recognizer reports.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct GesturePhases: u8 {
        /// See [`GesturePhase::Possible`].
        const POSSIBLE  = 0b0000_0001;
        /// See [`GesturePhase::Began`].
        const BEGAN     = 0b0000_0010;
        /// See [`GesturePhase::Changed`].
        const CHANGED   = 0b0000_0100;
        /// See [`GesturePhase::Ended`].
        const ENDED     = 0b0000_1000;
        /// See [`GesturePhase::Cancelled`].
        const CANCELLED = 0b0001_0000;
        /// See [`GesturePhase::Failed`].
        const FAILED    = 0b0010_0000;
    }
}

bitflags::bitflags! {
    /// The directions a swipe may travel.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct SwipeDirections: u8 {
        /// Leftward swipe.
        const LEFT  = 0b0000_0001;
        /// Rightward swipe.
        const RIGHT = 0b0000_0010;
        /// Upward swipe.
        const UP    = 0b0000_0100;
        /// Downward swipe.
        const DOWN  = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// The screen edges an edge pan may enter from.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct Edges: u8 {
        /// Top edge.
        const TOP    = 0b0000_0001;
        /// Leading (left) edge.
        const LEFT   = 0b0000_0010;
        /// Bottom edge.
        const BOTTOM = 0b0000_0100;
        /// Trailing (right) edge.
        const RIGHT  = 0b0000_1000;
        /// All four edges.
        const ALL    = Self::TOP.bits() | Self::LEFT.bits() | Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

/// A descriptor parameter was contradictory for its gesture kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// A tap or long press needs at least one tap.
    #[error("tap count must be at least 1")]
    ZeroTaps,
    /// Every contact-based gesture needs at least one touch.
    #[error("touch count must be at least 1")]
    ZeroTouches,
    /// A swipe with no direction can never fire.
    #[error("swipe requires a non-empty direction set")]
    EmptyDirections,
    /// An edge pan with no edges can never fire.
    #[error("edge pan requires a non-empty edge set")]
    EmptyEdges,
}

/// A gesture kind plus its trigger-state set and kind-specific parameters.
///
/// Descriptors are plain values with structural equality and hashing, so they
/// can be used directly as action-table keys. Fields that do not apply to a
/// kind are held at fixed defaults so that equality stays structural.
///
/// Construct through the per-kind constructors; they reject contradictory
/// parameters up front:
///
/// ```
/// use trellis_event::{DescriptorError, GestureDescriptor, SwipeDirections};
///
/// let swipe = GestureDescriptor::swipe(SwipeDirections::LEFT, 1).unwrap();
/// assert_eq!(
///     GestureDescriptor::swipe(SwipeDirections::empty(), 1),
///     Err(DescriptorError::EmptyDirections),
/// );
/// # let _ = swipe;
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GestureDescriptor {
    /// The gesture family.
    pub kind: GestureKind,
    /// Lifecycle states the gesture triggers in; empty means every state.
    pub phases: GesturePhases,
    /// Number of taps required (tap, long press).
    pub taps: u8,
    /// Number of touches required (contact-based gestures).
    pub touches: u8,
    /// Allowed swipe directions (swipe only).
    pub directions: SwipeDirections,
    /// Minimum press duration (long press only).
    pub min_duration: Duration,
    /// Edges the pan may enter from (edge pan only).
    pub edges: Edges,
}

impl GestureDescriptor {
    const fn base(kind: GestureKind) -> Self {
        Self {
            kind,
            phases: GesturePhases::empty(),
            taps: 0,
            touches: 0,
            directions: SwipeDirections::empty(),
            min_duration: Duration::ZERO,
            edges: Edges::empty(),
        }
    }

    /// A discrete tap with the given tap and touch counts.
    pub fn tap(taps: u8, touches: u8) -> Result<Self, DescriptorError> {
        if taps == 0 {
            return Err(DescriptorError::ZeroTaps);
        }
        if touches == 0 {
            return Err(DescriptorError::ZeroTouches);
        }
        Ok(Self {
            taps,
            touches,
            phases: GesturePhases::ENDED,
            ..Self::base(GestureKind::Tap)
        })
    }

    /// A press held for at least `min_duration`, with tap/touch counts.
    pub fn long_press(
        min_duration: Duration,
        taps: u8,
        touches: u8,
    ) -> Result<Self, DescriptorError> {
        if touches == 0 {
            return Err(DescriptorError::ZeroTouches);
        }
        Ok(Self {
            taps,
            touches,
            min_duration,
            phases: GesturePhases::BEGAN,
            ..Self::base(GestureKind::LongPress)
        })
    }

    /// A swipe in any of the given directions.
    pub fn swipe(directions: SwipeDirections, touches: u8) -> Result<Self, DescriptorError> {
        if directions.is_empty() {
            return Err(DescriptorError::EmptyDirections);
        }
        if touches == 0 {
            return Err(DescriptorError::ZeroTouches);
        }
        Ok(Self {
            directions,
            touches,
            phases: GesturePhases::ENDED,
            ..Self::base(GestureKind::Swipe)
        })
    }

    /// A continuous single-touch pan.
    pub fn pan() -> Result<Self, DescriptorError> {
        Ok(Self {
            touches: 1,
            ..Self::base(GestureKind::Pan)
        })
    }

    /// A two-finger pinch.
    pub fn pinch() -> Result<Self, DescriptorError> {
        Ok(Self {
            touches: 2,
            ..Self::base(GestureKind::Pinch)
        })
    }

    /// A two-finger rotation.
    pub fn rotation() -> Result<Self, DescriptorError> {
        Ok(Self {
            touches: 2,
            ..Self::base(GestureKind::Rotation)
        })
    }

    /// A pan entering from any of the given screen edges.
    pub fn edge_pan(edges: Edges) -> Result<Self, DescriptorError> {
        if edges.is_empty() {
            return Err(DescriptorError::EmptyEdges);
        }
        Ok(Self {
            edges,
            touches: 1,
            ..Self::base(GestureKind::EdgePan)
        })
    }

    /// A contactless hover.
    pub fn hover() -> Result<Self, DescriptorError> {
        Ok(Self::base(GestureKind::Hover))
    }

    /// Replaces the trigger-state set.
    ///
    /// An empty set means the gesture triggers in every phase.
    #[must_use]
    pub fn with_phases(mut self, phases: GesturePhases) -> Self {
        self.phases = phases;
        self
    }
}
