// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Router: lazily-resolved, type-erased event-to-action routing.
//!
//! A component declares, per input source, which actions each event produces.
//! The declaration is a table of producers, not of values: **actions are
//! computed at trigger time, never at table-construction time**, so a producer
//! can read live bound state instead of a stale capture.
//!
//! ## Layers
//!
//! - [`Mapping`]: an ordered builder of `EventKey → producer` entries for one
//!   source. Merging two mappings merges by key, concatenating producers in
//!   declaration order (n-way associative).
//! - [`ActionTable`]: binds one source *identity* to a merged mapping. Queries
//!   against any other source — even a structurally identical one — return
//!   empty, never an error.
//! - [`EventRouting`] / [`ActionRouter`]: the type-erased composition surface.
//!   A router is an ordered collection of tables (or nested routers); queries
//!   flatten in declaration order, which makes multi-action dispatch order
//!   deterministic.
//!
//! The router never inspects or compares action values; it only moves
//! [`ErasedAction`]s from producers to whoever asked.
//!
//! ## Minimal example
//!
//! ```
//! use std::sync::Arc;
//! use trellis_event::ControlEvent;
//! use trellis_router::{ActionRouter, ActionTable, EventRouting, Mapping};
//! use trellis_source::sim::SimControl;
//! use trellis_source::SharedSource;
//!
//! #[derive(Debug, PartialEq)]
//! enum Intent {
//!     Tapped(i64),
//! }
//!
//! let control = SimControl::new();
//! let source: SharedSource = control.clone();
//!
//! // The producer reads the control's tag when the event fires, not now.
//! let reader = control.clone();
//! let table = ActionTable::new(
//!     &source,
//!     Mapping::new().on(ControlEvent::PRIMARY, move || vec![Intent::Tapped(reader.tag())]),
//! );
//! let router = ActionRouter::new().with(table);
//!
//! control.set_tag(5);
//! let actions = router.resolve(&source, &ControlEvent::PRIMARY.into());
//! assert_eq!(actions[0].downcast_ref::<Intent>(), Some(&Intent::Tapped(5)));
//!
//! control.set_tag(9);
//! let actions = router.resolve(&source, &ControlEvent::PRIMARY.into());
//! assert_eq!(actions[0].downcast_ref::<Intent>(), Some(&Intent::Tapped(9)));
//! ```

mod mapping;
mod router;
mod table;

pub use mapping::{ActionProducer, Mapping};
pub use router::{ActionRouter, EventRouting, RouteEntry};
pub use table::ActionTable;

use std::any::Any;

/// An opaque, application-defined action value in type-erased form.
///
/// Routers and handler bindings move these around without ever inspecting
/// them; only a typed handler downcasts at the end of the line.
pub type ErasedAction = Box<dyn Any + Send>;
