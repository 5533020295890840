// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bound-state slots: per-object, type-erased storage for the latest
//! configured value.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A type-erased configuration value shared across bound-state slots.
///
/// Fan-out stamps the same allocation onto many slots, so values are held in
/// an `Arc` rather than cloned per slot.
pub type SharedValue = Arc<dyn Any + Send + Sync>;

/// A thread-safe slot holding the latest value bound to an object.
///
/// Reading a slot that was never set yields `None`; missing state is normal
/// control flow, not an error. The slot never interprets its value beyond the
/// downcast requested by the reader.
///
/// ```
/// use trellis_source::StateSlot;
///
/// let slot = StateSlot::new();
/// assert_eq!(slot.get::<i32>(), None);
///
/// slot.set(7_i32);
/// assert_eq!(slot.get::<i32>(), Some(7));
/// // A mismatched read is simply absent.
/// assert_eq!(slot.get::<String>(), None);
/// ```
#[derive(Default)]
pub struct StateSlot {
    value: Mutex<Option<SharedValue>>,
}

impl StateSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, replacing any previous value.
    pub fn set<T: Send + Sync + 'static>(&self, value: T) {
        self.set_shared(Arc::new(value));
    }

    /// Stores an already-erased shared value, replacing any previous value.
    pub fn set_shared(&self, value: SharedValue) {
        *self.lock() = Some(value);
    }

    /// Returns a clone of the stored value if it has type `T`.
    #[must_use]
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        self.lock().as_ref()?.downcast_ref::<T>().cloned()
    }

    /// Returns the stored value without downcasting.
    #[must_use]
    pub fn shared(&self) -> Option<SharedValue> {
        self.lock().clone()
    }

    /// Removes and returns the stored value.
    pub fn take(&self) -> Option<SharedValue> {
        self.lock().take()
    }

    /// Returns `true` if a value is currently stored.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<SharedValue>> {
        // A poisoned slot still holds a coherent Option; recover it.
        self.value.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for StateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}
