// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler binding: one resource box per routed `(source, event)` pair.

use std::sync::Arc;

use trellis_event::EventKey;
use trellis_pool::{BoxCallback, ControlBox, GestureBox};
use trellis_router::{ActionRouter, EventRouting};
use trellis_source::{DetectorHandle, GestureArea, InputSource, WeakSource};

use crate::component::Component;
use crate::handler::AnyActionHandler;

/// Wires `handler` to every `(source, event)` entry of the component's
/// router.
///
/// For each entry, a resource box is created whose callback re-resolves the
/// entry's actions **at trigger time** and forwards each to `handler` (the
/// erased wrapper drops actions of other types silently). Gesture entries
/// reuse or instantiate one detector per gesture kind on the source's gesture
/// area, configured from the descriptor and with conflict cancellation left
/// disabled. Every box lands in the component's pool under the handler's
/// identity.
///
/// Idempotent per (component, handler identity): adding a handler that is
/// already wired is a no-op. Entries whose source lacks the needed
/// capability are skipped.
pub fn add_handler<C: Component>(component: &Arc<C>, handler: &AnyActionHandler) {
    let core = component.core();
    let owner = handler.owner();
    if core.pool().has_owner(owner) {
        tracing::debug!(?owner, "handler already bound, skipping");
        return;
    }

    let router = component.router();
    for entry in router.entries() {
        let callback = resolving_callback(
            router.clone(),
            Arc::downgrade(&entry.source),
            entry.key,
            handler.clone(),
        );
        match entry.key {
            EventKey::Control(event) => {
                if let Some(resource) =
                    ControlBox::attach(&entry.source, event, callback, core.scheduler())
                {
                    core.pool().insert_owned(resource, owner);
                }
            }
            EventKey::Gesture(descriptor) => {
                let Some(area) = entry.source.gestures() else {
                    continue;
                };
                let detector = match area.detector(descriptor.kind) {
                    Some(existing) => existing,
                    None => {
                        let detector = Arc::new(DetectorHandle::from_descriptor(&descriptor));
                        area.attach_detector(detector.clone());
                        detector
                    }
                };
                let resource =
                    GestureBox::attach(&detector, descriptor.phases, callback, core.scheduler());
                core.pool().insert_owned(resource, owner);
            }
        }
    }
    core.record_bound_owner(owner);
    tracing::debug!(?owner, "handler bound");
}

/// Removes every resource box wired for `handler`.
///
/// Unknown handlers are a no-op.
pub fn remove_handler<C: Component>(component: &Arc<C>, handler: &AnyActionHandler) {
    let core = component.core();
    core.pool().remove(handler.owner());
    core.forget_bound_owner(handler.owner());
}

/// Removes every handler this binding layer wired to `component`.
///
/// Pool entries created outside the binding layer are untouched.
pub fn remove_all_handlers<C: Component>(component: &Arc<C>) {
    let core = component.core();
    for owner in core.take_bound_owners() {
        core.pool().remove(owner);
    }
}

/// Replaces every wired handler with `handler`.
///
/// Net effect: exactly this one handler is wired, whatever was there before.
pub fn assign_handler<C: Component>(component: &Arc<C>, handler: &AnyActionHandler) {
    remove_all_handlers(component);
    add_handler(component, handler);
}

/// Symmetric convenience for [`add_handler`]; safe to call repeatedly.
pub fn attach<C: Component>(handler: &AnyActionHandler, component: &Arc<C>) {
    add_handler(component, handler);
}

/// Symmetric convenience for [`remove_handler`]; safe to call repeatedly.
pub fn detach<C: Component>(handler: &AnyActionHandler, component: &Arc<C>) {
    remove_handler(component, handler);
}

fn resolving_callback(
    router: ActionRouter,
    source: WeakSource,
    key: EventKey,
    handler: AnyActionHandler,
) -> BoxCallback {
    Arc::new(move |_sender| {
        let Some(source) = source.upgrade() else {
            return;
        };
        for action in router.resolve(&source, &key) {
            handler.deliver(action);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentCore;
    use crate::handler::ActionHandler;
    use crate::observer::configure;
    use std::sync::Mutex;
    use trellis_event::{ControlEvent, GestureDescriptor, GestureKind, GesturePhase};
    use trellis_router::{ActionTable, Mapping};
    use trellis_source::sim::SimControl;
    use trellis_source::SharedSource;

    #[derive(Debug, Clone, PartialEq)]
    enum Intent {
        Tapped(i64),
        Panned,
    }

    struct Widget {
        core: ComponentCore,
        control: Arc<SimControl>,
    }

    impl Widget {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                core: ComponentCore::new(),
                control: SimControl::new(),
            })
        }
    }

    impl Component for Widget {
        type State = i64;
        fn core(&self) -> &ComponentCore {
            &self.core
        }
        fn router(&self) -> ActionRouter {
            let source: SharedSource = self.control.clone();
            let reader = self.control.clone();
            ActionRouter::new().with(ActionTable::new(
                &source,
                Mapping::new()
                    .on(ControlEvent::PRIMARY, move || {
                        vec![Intent::Tapped(reader.tag())]
                    })
                    .on(GestureDescriptor::pan().unwrap(), || vec![Intent::Panned]),
            ))
        }
        fn render(&self, state: &i64) {
            self.control.set_tag(*state);
        }
    }

    struct Recorder(Mutex<Vec<Intent>>);

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }
        fn taken(&self) -> Vec<Intent> {
            std::mem::take(&mut self.0.lock().unwrap())
        }
    }

    impl ActionHandler for Recorder {
        type Action = Intent;
        fn handle(&self, action: Intent) {
            self.0.lock().unwrap().push(action);
        }
    }

    #[test]
    fn add_wires_every_entry() {
        let widget = Widget::new();
        let recorder = Recorder::new();
        add_handler(&widget, &AnyActionHandler::new(&recorder));

        // One control target plus one gesture listener.
        assert_eq!(widget.control.target_count(), 1);
        let detector = widget.control.detector(GestureKind::Pan).unwrap();
        assert_eq!(detector.listener_count(), 1);
        assert_eq!(widget.core.pool().len(), 2);

        widget.control.simulate(ControlEvent::PRIMARY);
        detector.trigger(GesturePhase::Began);
        assert_eq!(recorder.taken(), vec![Intent::Tapped(0), Intent::Panned]);
    }

    #[test]
    fn add_is_idempotent_by_handler_identity() {
        let widget = Widget::new();
        let recorder = Recorder::new();
        let erased = AnyActionHandler::new(&recorder);
        add_handler(&widget, &erased);
        add_handler(&widget, &erased);
        add_handler(&widget, &AnyActionHandler::new(&recorder));

        assert_eq!(widget.control.target_count(), 1);
        widget.control.simulate(ControlEvent::PRIMARY);
        assert_eq!(recorder.taken().len(), 1);
    }

    #[test]
    fn remove_detaches_and_is_idempotent() {
        let widget = Widget::new();
        let recorder = Recorder::new();
        let erased = AnyActionHandler::new(&recorder);
        add_handler(&widget, &erased);
        remove_handler(&widget, &erased);
        remove_handler(&widget, &erased);

        assert_eq!(widget.control.target_count(), 0);
        assert!(widget.core.pool().is_empty());
        widget.control.simulate(ControlEvent::PRIMARY);
        assert!(recorder.taken().is_empty());
    }

    #[test]
    fn assign_replaces_all_previous_handlers() {
        let widget = Widget::new();
        let h1 = Recorder::new();
        let h2 = Recorder::new();
        let h3 = Recorder::new();
        add_handler(&widget, &AnyActionHandler::new(&h1));
        add_handler(&widget, &AnyActionHandler::new(&h2));
        assign_handler(&widget, &AnyActionHandler::new(&h3));

        widget.control.simulate(ControlEvent::PRIMARY);
        assert!(h1.taken().is_empty());
        assert!(h2.taken().is_empty());
        assert_eq!(h3.taken(), vec![Intent::Tapped(0)]);
    }

    #[test]
    fn mismatched_handler_type_receives_nothing() {
        struct StringHandler(Mutex<Vec<String>>);
        impl ActionHandler for StringHandler {
            type Action = String;
            fn handle(&self, action: String) {
                self.0.lock().unwrap().push(action);
            }
        }

        let widget = Widget::new();
        let strings = Arc::new(StringHandler(Mutex::new(Vec::new())));
        let intents = Recorder::new();
        add_handler(&widget, &AnyActionHandler::new(&strings));
        add_handler(&widget, &AnyActionHandler::new(&intents));

        widget.control.simulate(ControlEvent::PRIMARY);
        assert!(strings.0.lock().unwrap().is_empty());
        assert_eq!(intents.taken(), vec![Intent::Tapped(0)]);
    }

    #[test]
    fn gesture_detectors_are_shared_per_kind() {
        let widget = Widget::new();
        let h1 = Recorder::new();
        let h2 = Recorder::new();
        add_handler(&widget, &AnyActionHandler::new(&h1));
        add_handler(&widget, &AnyActionHandler::new(&h2));

        let detector = widget.control.detector(GestureKind::Pan).unwrap();
        assert_eq!(detector.listener_count(), 2);
        assert!(!detector.cancels_conflicting());

        detector.trigger(GesturePhase::Changed);
        assert_eq!(h1.taken(), vec![Intent::Panned]);
        assert_eq!(h2.taken(), vec![Intent::Panned]);
    }

    #[test]
    fn actions_resolve_against_live_configured_state() {
        let widget = Widget::new();
        let recorder = Recorder::new();
        add_handler(&widget, &AnyActionHandler::new(&recorder));

        configure(&widget, 5);
        widget.control.simulate(ControlEvent::PRIMARY);
        configure(&widget, 9);
        widget.control.simulate(ControlEvent::PRIMARY);

        assert_eq!(
            recorder.taken(),
            vec![Intent::Tapped(5), Intent::Tapped(9)]
        );
    }

    #[test]
    fn dropping_the_component_tears_down_registrations() {
        let widget = Widget::new();
        let control = widget.control.clone();
        let recorder = Recorder::new();
        add_handler(&widget, &AnyActionHandler::new(&recorder));
        assert_eq!(control.target_count(), 1);

        drop(widget);
        assert_eq!(control.target_count(), 0);
        control.simulate(ControlEvent::PRIMARY);
        assert!(recorder.taken().is_empty());
    }
}
