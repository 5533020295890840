// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A form with a submit button and a swipe-to-dismiss surface, wired
//! end to end: configure state, simulate input, watch actions arrive.

use std::sync::Arc;

use trellis_binding::{
    add_handler, configure, AnyActionHandler, Component, ComponentCore,
};
use trellis_demos::PrintingHandler;
use trellis_event::{ControlEvent, GestureDescriptor, GesturePhase, SwipeDirections};
use trellis_router::{ActionRouter, ActionTable, Mapping};
use trellis_source::sim::SimControl;
use trellis_source::{GestureArea, InputSource, SharedSource};

#[derive(Debug, Clone, PartialEq)]
enum FormAction {
    Submit { draft_id: i64 },
    Dismiss,
}

struct FormView {
    core: ComponentCore,
    submit: Arc<SimControl>,
    sheet: Arc<SimControl>,
}

impl FormView {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            core: ComponentCore::new(),
            submit: SimControl::new(),
            sheet: SimControl::new(),
        })
    }
}

impl Component for FormView {
    type State = i64;

    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn router(&self) -> ActionRouter {
        let submit: SharedSource = self.submit.clone();
        let sheet: SharedSource = self.sheet.clone();
        let state = self.submit.clone();
        ActionRouter::new()
            .with(ActionTable::new(
                &submit,
                Mapping::new().on(ControlEvent::PRIMARY, move || {
                    vec![FormAction::Submit {
                        draft_id: state.bound_state().get::<i64>().unwrap_or_default(),
                    }]
                }),
            ))
            .with(ActionTable::new(
                &sheet,
                Mapping::new().on(
                    GestureDescriptor::swipe(SwipeDirections::DOWN, 1).unwrap(),
                    || vec![FormAction::Dismiss],
                ),
            ))
    }

    fn render(&self, state: &i64) {
        println!("rendering form for draft {state}");
        self.submit.set_tag(*state);
    }
}

fn main() {
    let form = FormView::new();
    let handler = PrintingHandler::<FormAction>::new("form");
    add_handler(&form, &AnyActionHandler::new(&handler));

    configure(&form, 5);
    form.submit.simulate(ControlEvent::PRIMARY);

    configure(&form, 9);
    form.submit.simulate(ControlEvent::PRIMARY);

    let swipe = GestureDescriptor::swipe(SwipeDirections::DOWN, 1).unwrap();
    if let Some(detector) = form.sheet.detector(swipe.kind) {
        detector.trigger(GesturePhase::Ended);
    }

    println!("{} actions delivered", handler.count());
}
