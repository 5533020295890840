// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture detector handles and the surface they attach to.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use trellis_event::{Edges, GestureDescriptor, GestureKind, GesturePhase, SwipeDirections};

use crate::source::{Invocation, RegistrationToken};

/// The visual container gestures attach to.
///
/// A source with gesture support exposes one of these. The engine attaches at
/// most one detector per gesture kind; [`GestureArea::detector`] is how it
/// finds an existing one before creating another.
pub trait GestureArea: Send + Sync {
    /// Returns the attached detector for `kind`, if any.
    fn detector(&self, kind: GestureKind) -> Option<Arc<DetectorHandle>>;

    /// Attaches a detector to this container.
    ///
    /// The host is expected to start driving the detector's lifecycle
    /// ([`DetectorHandle::trigger`]) from its native recognizer events.
    fn attach_detector(&self, detector: Arc<DetectorHandle>);

    /// Detaches the detector for `kind`, if attached. Unknown kinds are
    /// ignored.
    fn detach_detector(&self, kind: GestureKind);
}

/// The recognition parameters a detector was configured with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Required tap count.
    pub taps: u8,
    /// Required touch count.
    pub touches: u8,
    /// Allowed swipe directions.
    pub directions: SwipeDirections,
    /// Minimum press duration.
    pub min_duration: Duration,
    /// Allowed entry edges.
    pub edges: Edges,
}

/// The library-side handle for one native gesture recognizer.
///
/// One handle exists per gesture kind attached to a [`GestureArea`]. The host
/// drives it: when its native recognizer changes phase, it calls
/// [`DetectorHandle::trigger`], which records the phase and invokes every
/// registered listener with the handle itself as the native sender.
///
/// Conflict cancellation (the native default of cancelling touches delivered
/// to other recognizers) starts out disabled, so co-existing gestures keep
/// receiving touches.
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use trellis_event::{GestureDescriptor, GesturePhase};
/// use trellis_source::DetectorHandle;
///
/// let tap = GestureDescriptor::tap(1, 1).unwrap();
/// let detector = Arc::new(DetectorHandle::from_descriptor(&tap));
/// assert!(!detector.cancels_conflicting());
///
/// let hits = Arc::new(AtomicUsize::new(0));
/// let seen = hits.clone();
/// detector.add_listener(Arc::new(move |_sender| {
///     seen.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// detector.trigger(GesturePhase::Ended);
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// assert_eq!(detector.phase(), GesturePhase::Ended);
/// ```
pub struct DetectorHandle {
    kind: GestureKind,
    config: DetectorConfig,
    cancels_conflicting: AtomicBool,
    phase: Mutex<GesturePhase>,
    listeners: Mutex<Vec<(RegistrationToken, Invocation)>>,
    next_token: AtomicU64,
}

impl DetectorHandle {
    /// Builds a detector configured from a gesture descriptor.
    #[must_use]
    pub fn from_descriptor(descriptor: &GestureDescriptor) -> Self {
        Self {
            kind: descriptor.kind,
            config: DetectorConfig {
                taps: descriptor.taps,
                touches: descriptor.touches,
                directions: descriptor.directions,
                min_duration: descriptor.min_duration,
                edges: descriptor.edges,
            },
            cancels_conflicting: AtomicBool::new(false),
            phase: Mutex::new(GesturePhase::Possible),
            listeners: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// The gesture kind this detector recognizes.
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// The parameters this detector was configured with.
    #[must_use]
    pub fn config(&self) -> DetectorConfig {
        self.config
    }

    /// The most recent lifecycle phase the host reported.
    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        *lock(&self.phase)
    }

    /// Whether this detector cancels touches delivered to other recognizers.
    #[must_use]
    pub fn cancels_conflicting(&self) -> bool {
        self.cancels_conflicting.load(Ordering::Relaxed)
    }

    /// Overrides the conflict-cancellation policy.
    pub fn set_cancels_conflicting(&self, cancels: bool) {
        self.cancels_conflicting.store(cancels, Ordering::Relaxed);
    }

    /// Registers a listener invoked on every phase change.
    pub fn add_listener(&self, invocation: Invocation) -> RegistrationToken {
        let token = RegistrationToken::new(self.next_token.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((token, invocation));
        token
    }

    /// Removes a listener. Unknown tokens are ignored.
    pub fn remove_listener(&self, token: RegistrationToken) {
        lock(&self.listeners).retain(|(t, _)| *t != token);
    }

    /// The number of currently registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Reports a phase change and invokes every listener with this handle as
    /// the native sender.
    pub fn trigger(&self, phase: GesturePhase) {
        *lock(&self.phase) = phase;
        tracing::trace!(kind = ?self.kind, ?phase, "gesture detector triggered");
        // Invoke outside the lock: listeners may add or remove registrations.
        let listeners: Vec<Invocation> = lock(&self.listeners)
            .iter()
            .map(|(_, invocation)| invocation.clone())
            .collect();
        for invocation in listeners {
            invocation(self);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl fmt::Debug for DetectorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorHandle")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .field("phase", &self.phase())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use trellis_event::GesturePhases;

    fn pan_detector() -> Arc<DetectorHandle> {
        Arc::new(DetectorHandle::from_descriptor(
            &GestureDescriptor::pan().unwrap(),
        ))
    }

    #[test]
    fn config_mirrors_descriptor() {
        let descriptor = GestureDescriptor::long_press(Duration::from_millis(500), 0, 2).unwrap();
        let detector = DetectorHandle::from_descriptor(&descriptor);
        assert_eq!(detector.kind(), GestureKind::LongPress);
        assert_eq!(detector.config().min_duration, Duration::from_millis(500));
        assert_eq!(detector.config().touches, 2);
    }

    #[test]
    fn conflict_cancellation_defaults_off() {
        let detector = pan_detector();
        assert!(!detector.cancels_conflicting());
        detector.set_cancels_conflicting(true);
        assert!(detector.cancels_conflicting());
    }

    #[test]
    fn trigger_records_phase_and_invokes_listeners() {
        let detector = pan_detector();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        detector.add_listener(Arc::new(move |sender| {
            // The sender is the detector handle itself.
            assert!(sender.downcast_ref::<DetectorHandle>().is_some());
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        detector.trigger(GesturePhase::Began);
        detector.trigger(GesturePhase::Changed);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(detector.phase(), GesturePhase::Changed);
    }

    #[test]
    fn removed_listener_is_not_invoked() {
        let detector = pan_detector();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let token = detector.add_listener(Arc::new(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        detector.remove_listener(token);
        detector.trigger(GesturePhase::Ended);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(detector.listener_count(), 0);
        // Removing again is a no-op.
        detector.remove_listener(token);
    }

    #[test]
    fn phases_from_descriptor_are_available_for_filtering() {
        let descriptor = GestureDescriptor::pan()
            .unwrap()
            .with_phases(GesturePhases::BEGAN | GesturePhases::CHANGED);
        assert!(descriptor.phases.contains(GesturePhases::BEGAN));
    }
}
