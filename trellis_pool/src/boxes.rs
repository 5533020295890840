// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Concrete resource boxes, one per input-source category.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use trellis_event::{ControlEvent, GesturePhases};
use trellis_source::{
    run_on_ui, DetectorHandle, RegistrationToken, Scheduler, SharedSource, WeakSource,
};

use crate::OwnerId;

/// The invocation callback a resource box drives.
///
/// Receives the native sender; cleared when the box is cleaned, which breaks
/// any capture cycle through the callback.
pub type BoxCallback = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// One native registration bound to an owning component's lifetime.
///
/// `cleanup` must remove the native registration, clear the stored callback,
/// and be idempotent — the second call is observably inert.
pub trait ResourceBox: Send + Sync {
    /// The owner tag, if one was stamped.
    fn owner(&self) -> Option<OwnerId>;

    /// Stamps the owner tag used for grouped removal.
    fn set_owner(&self, owner: OwnerId);

    /// Tears the registration down. Terminal and idempotent.
    fn cleanup(&self);

    /// The box as `Any`, for concrete-type introspection.
    fn as_any(&self) -> &dyn Any;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// A resource box for one discrete control registration.
///
/// Holds the source weakly: the box owns the *registration*, never the native
/// source. Attachment registers an invocation path on the source's control
/// registry; `invoke` runs the stored callback, optionally guarded by an
/// expected concrete sender type.
pub struct ControlBox {
    source: WeakSource,
    event: ControlEvent,
    callback: Mutex<Option<BoxCallback>>,
    token: Mutex<Option<RegistrationToken>>,
    owner: Mutex<Option<OwnerId>>,
    expected_sender: Option<TypeId>,
    cleaned: AtomicBool,
    scheduler: Arc<dyn Scheduler>,
}

impl ControlBox {
    /// Attaches a box to `source` for `event`.
    ///
    /// Returns `None` if the source has no control registry. The native
    /// registration happens on the UI thread; when called off it, the
    /// registration is posted and the box is returned immediately.
    pub fn attach(
        source: &SharedSource,
        event: ControlEvent,
        callback: BoxCallback,
        scheduler: &Arc<dyn Scheduler>,
    ) -> Option<Arc<Self>> {
        Self::attach_inner(source, event, callback, None, scheduler)
    }

    /// Like [`ControlBox::attach`], but `invoke` silently drops senders that
    /// are not of concrete type `S`.
    pub fn attach_expecting<S: Any>(
        source: &SharedSource,
        event: ControlEvent,
        callback: BoxCallback,
        scheduler: &Arc<dyn Scheduler>,
    ) -> Option<Arc<Self>> {
        Self::attach_inner(source, event, callback, Some(TypeId::of::<S>()), scheduler)
    }

    fn attach_inner(
        source: &SharedSource,
        event: ControlEvent,
        callback: BoxCallback,
        expected_sender: Option<TypeId>,
        scheduler: &Arc<dyn Scheduler>,
    ) -> Option<Arc<Self>> {
        source.control()?;
        let this = Arc::new(Self {
            source: Arc::downgrade(source),
            event,
            callback: Mutex::new(Some(callback)),
            token: Mutex::new(None),
            owner: Mutex::new(None),
            expected_sender,
            cleaned: AtomicBool::new(false),
            scheduler: scheduler.clone(),
        });

        let weak = Arc::downgrade(&this);
        let invocation: trellis_source::Invocation = Arc::new(move |sender: &dyn Any| {
            if let Some(resource) = weak.upgrade() {
                resource.invoke(sender);
            }
        });

        let register = {
            let this = this.clone();
            let source = this.source.clone();
            move || {
                let Some(source) = source.upgrade() else {
                    return;
                };
                let Some(registry) = source.control() else {
                    return;
                };
                let token = registry.add_target(event, invocation);
                // Cleanup may have raced the posted registration; undo.
                if this.cleaned.load(Ordering::SeqCst) {
                    registry.remove_target(token);
                } else {
                    *lock(&this.token) = Some(token);
                }
            }
        };
        run_on_ui(scheduler, register);
        tracing::trace!(event = ?event, "control box attached");
        Some(this)
    }

    /// The control event this box is registered for.
    #[must_use]
    pub fn event(&self) -> ControlEvent {
        self.event
    }

    /// Returns `true` once `cleanup` has run.
    #[must_use]
    pub fn is_cleaned(&self) -> bool {
        self.cleaned.load(Ordering::SeqCst)
    }

    /// Returns `true` while an invocation callback is stored.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        lock(&self.callback).is_some()
    }

    /// Runs the stored callback for a native trigger.
    ///
    /// A sender failing the expected-type check, or a box that was already
    /// cleaned, is silently ignored.
    pub fn invoke(&self, sender: &dyn Any) {
        if let Some(expected) = self.expected_sender {
            if sender.type_id() != expected {
                return;
            }
        }
        let callback = lock(&self.callback).clone();
        if let Some(callback) = callback {
            callback(sender);
        }
    }
}

impl ResourceBox for ControlBox {
    fn owner(&self) -> Option<OwnerId> {
        *lock(&self.owner)
    }

    fn set_owner(&self, owner: OwnerId) {
        *lock(&self.owner) = Some(owner);
    }

    fn cleanup(&self) {
        if self.cleaned.swap(true, Ordering::SeqCst) {
            return;
        }
        // Housekeeping is synchronous even off the UI thread.
        *lock(&self.callback) = None;
        let token = lock(&self.token).take();
        if let Some(token) = token {
            let source = self.source.clone();
            let event = self.event;
            run_on_ui(&self.scheduler, move || {
                if let Some(source) = source.upgrade() {
                    if let Some(registry) = source.control() {
                        registry.remove_target(token);
                        tracing::trace!(event = ?event, "control box detached");
                    }
                }
            });
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for ControlBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlBox")
            .field("event", &self.event)
            .field("owner", &self.owner())
            .field("cleaned", &self.is_cleaned())
            .finish()
    }
}

/// A resource box for one gesture listener registration.
///
/// Registered on a [`DetectorHandle`]; `invoke` filters by the detector's
/// current phase against `allowed_phases` (an empty set passes everything)
/// before running the callback.
pub struct GestureBox {
    detector: Weak<DetectorHandle>,
    allowed_phases: GesturePhases,
    callback: Mutex<Option<BoxCallback>>,
    token: Mutex<Option<RegistrationToken>>,
    owner: Mutex<Option<OwnerId>>,
    cleaned: AtomicBool,
    scheduler: Arc<dyn Scheduler>,
}

impl GestureBox {
    /// Attaches a box to `detector`, filtered to `allowed_phases`.
    pub fn attach(
        detector: &Arc<DetectorHandle>,
        allowed_phases: GesturePhases,
        callback: BoxCallback,
        scheduler: &Arc<dyn Scheduler>,
    ) -> Arc<Self> {
        let this = Arc::new(Self {
            detector: Arc::downgrade(detector),
            allowed_phases,
            callback: Mutex::new(Some(callback)),
            token: Mutex::new(None),
            owner: Mutex::new(None),
            cleaned: AtomicBool::new(false),
            scheduler: scheduler.clone(),
        });

        let weak = Arc::downgrade(&this);
        let invocation: trellis_source::Invocation = Arc::new(move |sender: &dyn Any| {
            if let Some(resource) = weak.upgrade() {
                resource.invoke(sender);
            }
        });

        let register = {
            let this = this.clone();
            let detector = this.detector.clone();
            move || {
                let Some(detector) = detector.upgrade() else {
                    return;
                };
                let token = detector.add_listener(invocation);
                if this.cleaned.load(Ordering::SeqCst) {
                    detector.remove_listener(token);
                } else {
                    *lock(&this.token) = Some(token);
                }
            }
        };
        run_on_ui(scheduler, register);
        this
    }

    /// The phase filter this box was created with.
    #[must_use]
    pub fn allowed_phases(&self) -> GesturePhases {
        self.allowed_phases
    }

    /// Returns `true` once `cleanup` has run.
    #[must_use]
    pub fn is_cleaned(&self) -> bool {
        self.cleaned.load(Ordering::SeqCst)
    }

    /// Runs the stored callback for a detector trigger.
    ///
    /// Senders that are not a [`DetectorHandle`], and phases outside the
    /// allowed set, are silently ignored.
    pub fn invoke(&self, sender: &dyn Any) {
        let Some(detector) = sender.downcast_ref::<DetectorHandle>() else {
            return;
        };
        if !self.allowed_phases.is_empty()
            && !self.allowed_phases.contains(detector.phase().into_set())
        {
            return;
        }
        let callback = lock(&self.callback).clone();
        if let Some(callback) = callback {
            callback(sender);
        }
    }
}

impl ResourceBox for GestureBox {
    fn owner(&self) -> Option<OwnerId> {
        *lock(&self.owner)
    }

    fn set_owner(&self, owner: OwnerId) {
        *lock(&self.owner) = Some(owner);
    }

    fn cleanup(&self) {
        if self.cleaned.swap(true, Ordering::SeqCst) {
            return;
        }
        *lock(&self.callback) = None;
        let token = lock(&self.token).take();
        if let Some(token) = token {
            let detector = self.detector.clone();
            run_on_ui(&self.scheduler, move || {
                if let Some(detector) = detector.upgrade() {
                    detector.remove_listener(token);
                }
            });
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for GestureBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureBox")
            .field("allowed_phases", &self.allowed_phases)
            .field("owner", &self.owner())
            .field("cleaned", &self.is_cleaned())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use trellis_event::{GestureDescriptor, GesturePhase};
    use trellis_source::sim::SimControl;
    use trellis_source::InlineScheduler;

    fn scheduler() -> Arc<dyn Scheduler> {
        Arc::new(InlineScheduler)
    }

    /// A scheduler that queues posted work for explicit draining.
    #[derive(Default)]
    struct QueueScheduler {
        queue: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
    }

    impl QueueScheduler {
        fn drain(&self) {
            let tasks: Vec<_> = lock(&self.queue).drain(..).collect();
            for task in tasks {
                task();
            }
        }
    }

    impl Scheduler for QueueScheduler {
        fn is_ui_thread(&self) -> bool {
            false
        }
        fn post(&self, task: Box<dyn FnOnce() + Send>) {
            lock(&self.queue).push(task);
        }
    }

    #[test]
    fn control_box_registers_and_invokes() {
        let control = SimControl::new();
        let source: SharedSource = control.clone();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let _resource = ControlBox::attach(
            &source,
            ControlEvent::PRIMARY,
            Arc::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            &scheduler(),
        )
        .unwrap();

        control.simulate(ControlEvent::PRIMARY);
        control.simulate(ControlEvent::PRIMARY);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cleanup_is_idempotent_and_detaches_once() {
        let control = SimControl::new();
        let source: SharedSource = control.clone();
        let resource =
            ControlBox::attach(&source, ControlEvent::PRIMARY, Arc::new(|_| {}), &scheduler())
                .unwrap();
        assert_eq!(control.target_count(), 1);

        resource.cleanup();
        assert_eq!(control.target_count(), 0);
        assert!(!resource.has_callback());

        // Second call is observably inert.
        resource.cleanup();
        assert_eq!(control.target_count(), 0);
        assert!(resource.is_cleaned());
    }

    #[test]
    fn cleaned_box_ignores_invocations() {
        let control = SimControl::new();
        let source: SharedSource = control.clone();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let resource = ControlBox::attach(
            &source,
            ControlEvent::PRIMARY,
            Arc::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            &scheduler(),
        )
        .unwrap();

        resource.cleanup();
        control.simulate(ControlEvent::PRIMARY);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn expected_sender_type_filters_invocations() {
        let control = SimControl::new();
        let source: SharedSource = control.clone();
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let resource = ControlBox::attach_expecting::<SimControl>(
            &source,
            ControlEvent::PRIMARY,
            Arc::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            &scheduler(),
        )
        .unwrap();

        // Wrong sender type: silently ignored.
        resource.invoke(&7_u32);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        control.simulate(ControlEvent::PRIMARY);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn off_thread_cleanup_clears_fields_now_and_detaches_later() {
        let control = SimControl::new();
        let source: SharedSource = control.clone();
        let queue = Arc::new(QueueScheduler::default());
        let scheduler: Arc<dyn Scheduler> = queue.clone();

        let resource =
            ControlBox::attach(&source, ControlEvent::PRIMARY, Arc::new(|_| {}), &scheduler)
                .unwrap();
        // Registration itself is deferred off the UI thread.
        assert_eq!(control.target_count(), 0);
        queue.drain();
        assert_eq!(control.target_count(), 1);

        resource.cleanup();
        // Fields clear synchronously; the native removal is queued.
        assert!(!resource.has_callback());
        assert!(resource.is_cleaned());
        assert_eq!(control.target_count(), 1);
        queue.drain();
        assert_eq!(control.target_count(), 0);
    }

    #[test]
    fn cleanup_racing_a_pending_registration_leaves_nothing_behind() {
        let control = SimControl::new();
        let source: SharedSource = control.clone();
        let queue = Arc::new(QueueScheduler::default());
        let scheduler: Arc<dyn Scheduler> = queue.clone();

        let resource =
            ControlBox::attach(&source, ControlEvent::PRIMARY, Arc::new(|_| {}), &scheduler)
                .unwrap();
        // Cleaned before the posted registration ran.
        resource.cleanup();
        queue.drain();
        assert_eq!(control.target_count(), 0);
    }

    #[test]
    fn gesture_box_filters_by_phase() {
        let detector = Arc::new(DetectorHandle::from_descriptor(
            &GestureDescriptor::pan().unwrap(),
        ));
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let _resource = GestureBox::attach(
            &detector,
            GesturePhases::ENDED,
            Arc::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            &scheduler(),
        );

        detector.trigger(GesturePhase::Began);
        detector.trigger(GesturePhase::Changed);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        detector.trigger(GesturePhase::Ended);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn gesture_box_empty_filter_passes_all_phases() {
        let detector = Arc::new(DetectorHandle::from_descriptor(
            &GestureDescriptor::pan().unwrap(),
        ));
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = hits.clone();
        let _resource = GestureBox::attach(
            &detector,
            GesturePhases::empty(),
            Arc::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
            &scheduler(),
        );

        detector.trigger(GesturePhase::Began);
        detector.trigger(GesturePhase::Ended);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn gesture_box_cleanup_removes_listener_once() {
        let detector = Arc::new(DetectorHandle::from_descriptor(
            &GestureDescriptor::tap(1, 1).unwrap(),
        ));
        let resource = GestureBox::attach(
            &detector,
            GesturePhases::empty(),
            Arc::new(|_| {}),
            &scheduler(),
        );
        assert_eq!(detector.listener_count(), 1);
        resource.cleanup();
        resource.cleanup();
        assert_eq!(detector.listener_count(), 0);
    }
}
