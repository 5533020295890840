// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulation sources for tests and demos.
//!
//! [`SimControl`] is a complete in-memory control: it implements
//! [`InputSource`] and [`ControlRegistry`], carries a mutable tag (so action
//! producers can observe trigger-time state), and can simulate its own native
//! triggers. Real toolkits integrate through the same traits; nothing in the
//! engine distinguishes a simulated control from a native one.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use trellis_event::{ControlEvent, GestureKind};

use crate::detector::{DetectorHandle, GestureArea};
use crate::source::{ControlRegistry, InputSource, Invocation, RegistrationToken};
use crate::state::StateSlot;

/// An in-memory discrete control with gesture support.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use trellis_event::ControlEvent;
/// use trellis_source::sim::SimControl;
/// use trellis_source::ControlRegistry;
///
/// let control = SimControl::new();
/// let fired = Arc::new(AtomicUsize::new(0));
/// let seen = fired.clone();
/// control.add_target(
///     ControlEvent::PRIMARY,
///     Arc::new(move |_sender| {
///         seen.fetch_add(1, Ordering::SeqCst);
///     }),
/// );
///
/// // Only the registered event fires the target.
/// control.simulate(ControlEvent::VALUE_CHANGED);
/// assert_eq!(fired.load(Ordering::SeqCst), 0);
/// control.simulate(ControlEvent::PRIMARY);
/// assert_eq!(fired.load(Ordering::SeqCst), 1);
/// ```
pub struct SimControl {
    tag: AtomicI64,
    state: StateSlot,
    targets: Mutex<Vec<(RegistrationToken, ControlEvent, Invocation)>>,
    detectors: Mutex<Vec<Arc<DetectorHandle>>>,
    next_token: AtomicU64,
}

impl SimControl {
    /// Creates a control with tag `0`.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tag: AtomicI64::new(0),
            state: StateSlot::new(),
            targets: Mutex::new(Vec::new()),
            detectors: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
        })
    }

    /// The control's current tag.
    #[must_use]
    pub fn tag(&self) -> i64 {
        self.tag.load(Ordering::SeqCst)
    }

    /// Replaces the control's tag.
    pub fn set_tag(&self, tag: i64) {
        self.tag.store(tag, Ordering::SeqCst);
    }

    /// Simulates a native trigger of `event`, invoking every matching
    /// registration in FIFO order with this control as the sender.
    ///
    /// Returns the number of registrations invoked.
    pub fn simulate(&self, event: ControlEvent) -> usize {
        let matching: Vec<Invocation> = lock(&self.targets)
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, invocation)| invocation.clone())
            .collect();
        for invocation in &matching {
            invocation(self);
        }
        matching.len()
    }

    /// The number of live registrations, across all events.
    #[must_use]
    pub fn target_count(&self) -> usize {
        lock(&self.targets).len()
    }
}

impl InputSource for SimControl {
    fn bound_state(&self) -> &StateSlot {
        &self.state
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn control(&self) -> Option<&dyn ControlRegistry> {
        Some(self)
    }

    fn gestures(&self) -> Option<&dyn GestureArea> {
        Some(self)
    }
}

impl ControlRegistry for SimControl {
    fn add_target(&self, event: ControlEvent, invocation: Invocation) -> RegistrationToken {
        let token = RegistrationToken::new(self.next_token.fetch_add(1, Ordering::Relaxed));
        lock(&self.targets).push((token, event, invocation));
        token
    }

    fn remove_target(&self, token: RegistrationToken) {
        lock(&self.targets).retain(|(t, _, _)| *t != token);
    }
}

impl GestureArea for SimControl {
    fn detector(&self, kind: GestureKind) -> Option<Arc<DetectorHandle>> {
        lock(&self.detectors)
            .iter()
            .find(|d| d.kind() == kind)
            .cloned()
    }

    fn attach_detector(&self, detector: Arc<DetectorHandle>) {
        lock(&self.detectors).push(detector);
    }

    fn detach_detector(&self, kind: GestureKind) {
        lock(&self.detectors).retain(|d| d.kind() != kind);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl fmt::Debug for SimControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimControl")
            .field("tag", &self.tag())
            .field("targets", &self.target_count())
            .finish()
    }
}
