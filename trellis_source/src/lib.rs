// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Source: the seam between the binding engine and native input.
//!
//! Input sources — buttons, gesture surfaces, text fields — stay opaque behind
//! the [`InputSource`] trait. The engine only needs three things from them:
//!
//! - an **identity** ([`SourceId`]): sources are compared by identity, never by
//!   value, so two structurally identical controls are never conflated;
//! - a **bound-state slot** ([`StateSlot`]): the latest configured value,
//!   stamped by the state observer and read back by action producers at
//!   trigger time;
//! - optional **registration capabilities**: a [`ControlRegistry`] for discrete
//!   control triggers and a [`GestureArea`] for gesture detectors. A source
//!   without a capability simply does not participate in that event family.
//!
//! Registration is a single invocation path per (source, event) pair: the host
//! stores an [`Invocation`] under a [`RegistrationToken`] and must be able to
//! remove it again without leaking its registration table.
//!
//! ## UI affinity
//!
//! Native attach/detach side effects and callback invocation belong on one
//! designated UI thread. The [`Scheduler`] trait marshals work there when it is
//! requested from another thread ([`run_on_ui`] runs inline when already on the
//! UI thread, otherwise posts fire-and-forget). [`InlineScheduler`] treats the
//! current thread as the UI thread and is the default for tests and
//! single-threaded hosts.
//!
//! ## Simulation
//!
//! [`sim::SimControl`] is a self-contained control source used by the demos and
//! tests; real toolkits integrate through the same traits.
//!
//! ## Minimal example
//!
//! ```
//! use std::sync::Arc;
//! use trellis_event::ControlEvent;
//! use trellis_source::sim::SimControl;
//! use trellis_source::{ControlRegistry, InputSource, SharedSource, SourceId};
//!
//! let control = SimControl::new();
//! let source: SharedSource = control.clone();
//!
//! // Identity, not structure: a second control is a different source.
//! let other: SharedSource = SimControl::new();
//! assert_ne!(SourceId::of(&source), SourceId::of(&other));
//!
//! // Bound state is a typed slot on the source itself.
//! source.bound_state().set(41_i32);
//! assert_eq!(source.bound_state().get::<i32>(), Some(41));
//!
//! // Registration: one invocation path, removable by token.
//! let token = control.add_target(ControlEvent::PRIMARY, Arc::new(|_sender| {}));
//! control.remove_target(token);
//! assert_eq!(control.target_count(), 0);
//! ```

mod detector;
mod scheduler;
pub mod sim;
mod source;
mod state;

pub use detector::{DetectorConfig, DetectorHandle, GestureArea};
pub use scheduler::{run_on_ui, InlineScheduler, Scheduler};
pub use source::{
    ControlRegistry, InputSource, Invocation, RegistrationToken, SharedSource, SourceId,
    WeakSource,
};
pub use state::{SharedValue, StateSlot};
