// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Binding: wiring components, state, and action handlers together.
//!
//! This crate is the top of the Trellis stack. A host object becomes a
//! component by embedding a [`ComponentCore`] (an explicit field, not a
//! global side registry) and implementing [`Component`]: its action router,
//! its render step, and its state type.
//!
//! Three things then work without the component storing or mutating the data
//! it is given:
//!
//! - **Configuration** ([`configure`]): pushes a new state value through the
//!   component's [`StateObserver`], which re-renders and stamps the value
//!   onto every input source the router declares — so action producers read
//!   live state at trigger time with no explicit capture of the component.
//! - **Action handling** ([`add_handler`], [`remove_handler`],
//!   [`assign_handler`], ...): walks the router's entries, creates one
//!   resource box per `(source, event)` pair whose callback re-resolves the
//!   actions at trigger time and forwards them to the handler, and tracks the
//!   boxes in the component's pool under the handler's identity.
//! - **Teardown**: dropping the component drops its core, whose pool cleans
//!   up every native registration deterministically.
//!
//! ## Minimal example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use trellis_binding::{
//!     add_handler, configure, ActionHandler, AnyActionHandler, Component, ComponentCore,
//! };
//! use trellis_event::ControlEvent;
//! use trellis_router::{ActionRouter, ActionTable, Mapping};
//! use trellis_source::sim::SimControl;
//! use trellis_source::SharedSource;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Intent {
//!     Submitted(i64),
//! }
//!
//! struct SubmitButton {
//!     core: ComponentCore,
//!     control: Arc<SimControl>,
//!     router: ActionRouter,
//! }
//!
//! impl SubmitButton {
//!     fn new() -> Arc<Self> {
//!         let control = SimControl::new();
//!         let source: SharedSource = control.clone();
//!         let reader = control.clone();
//!         let router = ActionRouter::new().with(ActionTable::new(
//!             &source,
//!             Mapping::new().on(ControlEvent::PRIMARY, move || {
//!                 vec![Intent::Submitted(reader.tag())]
//!             }),
//!         ));
//!         Arc::new(Self { core: ComponentCore::new(), control, router })
//!     }
//! }
//!
//! impl Component for SubmitButton {
//!     type State = i64;
//!     fn core(&self) -> &ComponentCore {
//!         &self.core
//!     }
//!     fn router(&self) -> ActionRouter {
//!         self.router.clone()
//!     }
//!     fn render(&self, state: &i64) {
//!         self.control.set_tag(*state);
//!     }
//! }
//!
//! struct Recorder(Mutex<Vec<Intent>>);
//! impl ActionHandler for Recorder {
//!     type Action = Intent;
//!     fn handle(&self, action: Intent) {
//!         self.0.lock().unwrap().push(action);
//!     }
//! }
//!
//! let button = SubmitButton::new();
//! let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
//! add_handler(&button, &AnyActionHandler::new(&recorder));
//!
//! configure(&button, 5);
//! button.control.simulate(ControlEvent::PRIMARY);
//! configure(&button, 9);
//! button.control.simulate(ControlEvent::PRIMARY);
//!
//! assert_eq!(
//!     *recorder.0.lock().unwrap(),
//!     vec![Intent::Submitted(5), Intent::Submitted(9)],
//! );
//! ```

mod binding;
mod component;
mod handler;
mod observer;

pub use binding::{
    add_handler, assign_handler, attach, detach, remove_all_handlers, remove_handler,
};
pub use component::{Bindable, Component, ComponentCore, Configurable};
pub use handler::{ActionHandler, AnyActionHandler};
pub use observer::{configure, StateObserver};
