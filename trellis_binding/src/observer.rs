// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State observation: store the latest input, render, and fan out.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use trellis_router::EventRouting;
use trellis_source::{InputSource, SharedSource, SharedValue, StateSlot};

use crate::component::Component;

type RenderFn = Arc<dyn Fn(&SharedValue) + Send + Sync>;
type SourceProviderFn = Arc<dyn Fn() -> Vec<SharedSource> + Send + Sync>;
type HostStampFn = Arc<dyn Fn(&SharedValue) + Send + Sync>;

/// Holds a component's latest input and fans it out on every update.
///
/// Created lazily on the first configuration of a component and held by its
/// [`ComponentCore`](crate::ComponentCore). All closures capture the
/// component weakly: once the component is gone, [`StateObserver::update`] is
/// a safe no-op (no render, empty source list).
pub struct StateObserver {
    /// Re-renders the owning component from an updated value.
    render: Mutex<Option<RenderFn>>,
    /// Lists the input sources the owner's router currently declares.
    source_provider: Mutex<Option<SourceProviderFn>>,
    /// Stamps the owner's own bound-state slot.
    host_stamp: HostStampFn,
    /// The latest configured value.
    current: StateSlot,
}

impl StateObserver {
    /// Builds an observer for `component`, capturing it weakly.
    #[must_use]
    pub fn for_component<C: Component>(component: &Arc<C>) -> Arc<Self> {
        let render = {
            let weak = Arc::downgrade(component);
            Arc::new(move |value: &SharedValue| {
                let Some(component) = weak.upgrade() else {
                    return;
                };
                // A value of an unexpected type is ignored, not an error.
                if let Some(state) = value.downcast_ref::<C::State>() {
                    component.render(state);
                }
            })
        };
        let source_provider = {
            let weak = Arc::downgrade(component);
            Arc::new(move || match weak.upgrade() {
                Some(component) => component.router().sources(),
                None => Vec::new(),
            })
        };
        let host_stamp = {
            let weak = Arc::downgrade(component);
            Arc::new(move |value: &SharedValue| {
                if let Some(component) = weak.upgrade() {
                    component.core().bound_state().set_shared(value.clone());
                }
            })
        };
        Arc::new(Self {
            render: Mutex::new(Some(render)),
            source_provider: Mutex::new(Some(source_provider)),
            host_stamp,
            current: StateSlot::new(),
        })
    }

    /// Stores `value`, renders, and stamps it onto every declared source.
    ///
    /// In order:
    /// 1. `value` becomes the observer's current value and the owning
    ///    component's own bound state;
    /// 2. the render callback runs, exactly once, if present;
    /// 3. every source the owner's router currently reports gets `value`
    ///    stamped into its bound-state slot — which is how action producers
    ///    read live state at trigger time without capturing the component.
    pub fn update(&self, value: SharedValue) {
        self.current.set_shared(value.clone());
        (self.host_stamp)(&value);

        let render = lock(&self.render).clone();
        if let Some(render) = render {
            render(&value);
        }

        let provider = lock(&self.source_provider).clone();
        let sources = provider.map(|p| p()).unwrap_or_default();
        tracing::trace!(sources = sources.len(), "state fan-out");
        for source in sources {
            source.bound_state().set_shared(value.clone());
        }
    }

    /// The latest configured value, if it has type `T`.
    #[must_use]
    pub fn current<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.current.get::<T>()
    }

    /// Drops the render callback and source provider.
    ///
    /// Subsequent updates only record the value. Used by hosts that tear down
    /// presentation before the component itself goes away.
    pub fn disconnect(&self) {
        *lock(&self.render) = None;
        *lock(&self.source_provider) = None;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl fmt::Debug for StateObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateObserver")
            .field("current", &self.current)
            .finish()
    }
}

/// Configures `component` with a new state value.
///
/// Lazily installs the component's [`StateObserver`] on first use, then runs
/// [`StateObserver::update`]. See the crate docs for the full flow.
pub fn configure<C: Component>(component: &Arc<C>, state: C::State) {
    let observer = component
        .core()
        .observer_or_init(|| StateObserver::for_component(component));
    observer.update(Arc::new(state));
}
