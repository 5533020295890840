// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component host: configuration protocols and the composition core.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use hashbrown::HashSet;
use trellis_pool::{OwnerId, ResourcePool};
use trellis_router::ActionRouter;
use trellis_source::{InlineScheduler, Scheduler, StateSlot};

use crate::observer::StateObserver;

/// Applies externally-owned data to a view without storing it.
///
/// The simple one-method configuration protocol; hosts implement it directly
/// for leaf views that need no routing or observation.
pub trait Configurable {
    /// The data this view consumes.
    type Input;

    /// Applies `input` to the view's presentation.
    fn configure(&self, input: &Self::Input);
}

/// Mirrors a view-model's state onto a view.
///
/// Like [`Configurable`], but for values that change over a view's lifetime;
/// [`Component`]-based hosts get this behavior through
/// [`configure`](crate::configure) instead of implementing it by hand.
pub trait Bindable {
    /// The state this view mirrors.
    type State;

    /// Applies one state snapshot to the view's presentation.
    fn bind(&self, state: &Self::State);
}

/// The per-component composition field.
///
/// Embedding one of these is what makes a host object a component: it carries
/// the resource pool, the component's own bound-state slot, the lazily
/// created state observer, the set of handler owners the binding layer has
/// wired, and the UI scheduler. Everything dies with the host — dropping the
/// core drops the pool, which cleans up every native registration.
pub struct ComponentCore {
    pool: ResourcePool,
    state: StateSlot,
    observer: Mutex<Option<Arc<StateObserver>>>,
    bound_owners: Mutex<HashSet<OwnerId>>,
    scheduler: Arc<dyn Scheduler>,
}

impl ComponentCore {
    /// Creates a core using the inline scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scheduler(Arc::new(InlineScheduler))
    }

    /// Creates a core marshaling native side effects through `scheduler`.
    #[must_use]
    pub fn with_scheduler(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            pool: ResourcePool::new(),
            state: StateSlot::new(),
            observer: Mutex::new(None),
            bound_owners: Mutex::new(HashSet::new()),
            scheduler,
        }
    }

    /// The component's resource pool.
    #[must_use]
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// The component's own bound-state slot.
    #[must_use]
    pub fn bound_state(&self) -> &StateSlot {
        &self.state
    }

    /// The component's UI scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }

    /// The component's observer, if configuration has created one.
    #[must_use]
    pub fn observer(&self) -> Option<Arc<StateObserver>> {
        lock(&self.observer).clone()
    }

    pub(crate) fn observer_or_init(
        &self,
        init: impl FnOnce() -> Arc<StateObserver>,
    ) -> Arc<StateObserver> {
        lock(&self.observer).get_or_insert_with(init).clone()
    }

    pub(crate) fn record_bound_owner(&self, owner: OwnerId) {
        lock(&self.bound_owners).insert(owner);
    }

    pub(crate) fn forget_bound_owner(&self, owner: OwnerId) {
        lock(&self.bound_owners).remove(&owner);
    }

    pub(crate) fn take_bound_owners(&self) -> Vec<OwnerId> {
        lock(&self.bound_owners).drain().collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl Default for ComponentCore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCore")
            .field("pool", &self.pool)
            .field("state", &self.state)
            .finish()
    }
}

/// A host object wired into the Trellis stack.
///
/// Components declare their routing, their render step, and their state type;
/// they live in `Arc`s so that observers and callbacks can reference them
/// weakly. The component never stores the state it is given — the core's
/// slots do.
pub trait Component: Send + Sync + 'static {
    /// The configuration value this component renders.
    type State: Clone + Send + Sync + 'static;

    /// The embedded composition core.
    fn core(&self) -> &ComponentCore;

    /// The component's current action router.
    ///
    /// Called on every binding walk and state fan-out; return a clone of the
    /// declared router.
    fn router(&self) -> ActionRouter;

    /// Updates presentation from one state snapshot.
    fn render(&self, state: &Self::State);
}
