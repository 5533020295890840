// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The opaque input-source trait and its registration surfaces.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

use trellis_event::ControlEvent;

use crate::detector::GestureArea;
use crate::state::StateSlot;

/// A shared handle to an opaque input source.
pub type SharedSource = Arc<dyn InputSource>;

/// A non-owning handle to an opaque input source.
///
/// Everything that must not keep a native source alive — resource boxes,
/// action tables, state observers — holds one of these and checks liveness
/// before use.
pub type WeakSource = Weak<dyn InputSource>;

/// The invocation path registered on a native source.
///
/// The `&dyn Any` argument is the native sender; receivers that expect a
/// particular concrete sender downcast it and silently ignore mismatches.
pub type Invocation = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// A token identifying one registration on a native source.
///
/// Tokens are minted by the host's registration table and passed back for
/// removal, so the table never leaks entries.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct RegistrationToken(u64);

impl RegistrationToken {
    /// Creates a token from a host-defined raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw token value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The identity of an input source.
///
/// Derived from the pointer of the source's allocation: two handles to the
/// same source compare equal, two structurally identical sources do not.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

impl SourceId {
    /// Returns the identity of a shared source handle.
    #[must_use]
    pub fn of(source: &SharedSource) -> Self {
        Self(Arc::as_ptr(source) as *const () as usize)
    }

    /// Returns the identity behind a weak handle, if the source is alive.
    #[must_use]
    pub fn of_weak(source: &WeakSource) -> Option<Self> {
        source.upgrade().map(|s| Self::of(&s))
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({:#x})", self.0)
    }
}

/// An opaque object that can emit discrete trigger events.
///
/// The engine never inspects a source beyond this trait: identity, a
/// bound-state slot, and the optional registration capabilities. Default
/// implementations report no capabilities, so a plain stateful object can be
/// a source without accepting any registrations.
pub trait InputSource: Any + Send + Sync {
    /// The source's bound-state slot.
    ///
    /// State fan-out stamps the latest configured value here; action producers
    /// read it back at trigger time.
    fn bound_state(&self) -> &StateSlot;

    /// The source as `Any`, for concrete-type introspection.
    fn as_any(&self) -> &dyn Any;

    /// The discrete-control registration table, if this source has one.
    fn control(&self) -> Option<&dyn ControlRegistry> {
        None
    }

    /// The gesture attachment surface, if this source has one.
    fn gestures(&self) -> Option<&dyn GestureArea> {
        None
    }
}

/// The registration table of a discrete control.
///
/// Exactly one invocation path is registered per (source, event) entry the
/// engine creates; the returned token removes it again. Hosts decide how
/// events map onto their toolkit's native trigger kinds.
pub trait ControlRegistry: Send + Sync {
    /// Registers `invocation` to run when `event` fires on this control.
    fn add_target(&self, event: ControlEvent, invocation: Invocation) -> RegistrationToken;

    /// Removes a previously added registration. Unknown tokens are ignored.
    fn remove_target(&self, token: RegistrationToken);
}
