// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Pool: resource boxes and the lifecycle pool that owns them.
//!
//! A [`ResourceBox`] wraps one native registration — a control target or a
//! gesture listener — together with the invocation callback it drives. Boxes
//! move through three states: *attached* (registered with the native source),
//! *invoked* (zero or more times), and *cleaned* (callback cleared, native
//! registration removed; terminal and idempotent).
//!
//! A [`ResourcePool`] is the per-component collection of boxes. It is
//! thread-safe, supports grouped removal by [`OwnerId`], and cleans up every
//! remaining box when dropped — which is how native registrations get torn
//! down deterministically when the owning component dies.
//!
//! ## UI affinity
//!
//! Pool mutation (insert, remove, cleanup) may be called from any thread; the
//! backing list is lock-protected and mutations are linearizable. The native
//! attach/detach side effects are marshaled onto the UI thread via the
//! component's [`Scheduler`](trellis_source::Scheduler) when triggered off it.
//! A box cleaned from a background thread still clears its own fields
//! synchronously; only the native removal is deferred.
//!
//! ## Minimal example
//!
//! ```
//! use std::sync::Arc;
//! use trellis_event::ControlEvent;
//! use trellis_pool::{ControlBox, OwnerId, ResourcePool};
//! use trellis_source::sim::SimControl;
//! use trellis_source::{InlineScheduler, Scheduler, SharedSource};
//!
//! let control = SimControl::new();
//! let source: SharedSource = control.clone();
//! let scheduler: Arc<dyn Scheduler> = Arc::new(InlineScheduler);
//!
//! let resource =
//!     ControlBox::attach(&source, ControlEvent::PRIMARY, Arc::new(|_| {}), &scheduler).unwrap();
//! assert_eq!(control.target_count(), 1);
//!
//! let pool = ResourcePool::new();
//! pool.insert_owned(resource, OwnerId::token(1));
//!
//! // Dropping the pool tears the native registration down.
//! drop(pool);
//! assert_eq!(control.target_count(), 0);
//! ```

mod boxes;
mod pool;

pub use boxes::{BoxCallback, ControlBox, GestureBox, ResourceBox};
pub use pool::ResourcePool;

use std::fmt;
use std::sync::Arc;

/// A tag grouping resource boxes for bulk removal.
///
/// Typically the identity of the action handler that caused the boxes to
/// exist, derived from its allocation pointer; arbitrary tokens work too.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(usize);

impl OwnerId {
    /// The identity of a shared handle.
    #[must_use]
    pub fn of<T: ?Sized>(handle: &Arc<T>) -> Self {
        Self(Arc::as_ptr(handle) as *const () as usize)
    }

    /// An arbitrary owner token.
    #[must_use]
    pub const fn token(raw: usize) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({:#x})", self.0)
    }
}
