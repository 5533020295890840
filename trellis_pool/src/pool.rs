// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-component pool of resource boxes.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::boxes::ResourceBox;
use crate::OwnerId;

/// A thread-safe, per-component collection of resource boxes.
///
/// Invariant: every box ever inserted is either still present or has had
/// `cleanup()` called exactly once. The pool is owned by exactly one host
/// component and cleans up everything left when dropped.
///
/// All list mutation happens under a single lock and is linearizable;
/// individual box cleanups run outside the lock because they may marshal to
/// the UI thread.
#[derive(Default)]
pub struct ResourcePool {
    items: Mutex<Vec<Arc<dyn ResourceBox>>>,
}

impl ResourcePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a box. O(1), callable from any thread.
    pub fn insert(&self, item: Arc<dyn ResourceBox>) {
        self.lock().push(item);
    }

    /// Stamps `owner` on the box, then appends it.
    pub fn insert_owned(&self, item: Arc<dyn ResourceBox>, owner: OwnerId) {
        item.set_owner(owner);
        tracing::trace!(?owner, "resource inserted");
        self.insert(item);
    }

    /// The first box whose concrete type is `T`, if any.
    ///
    /// Used to introspect existing registrations, e.g. to avoid
    /// re-registering.
    #[must_use]
    pub fn find<T: 'static>(&self) -> Option<Arc<dyn ResourceBox>> {
        self.lock()
            .iter()
            .find(|item| item.as_any().is::<T>())
            .cloned()
    }

    /// Returns `true` if any box carries `owner`.
    #[must_use]
    pub fn has_owner(&self, owner: OwnerId) -> bool {
        self.lock().iter().any(|item| item.owner() == Some(owner))
    }

    /// Cleans up and evicts every box stamped with `owner`.
    ///
    /// Boxes under other owners are untouched; removing an unknown owner is a
    /// no-op.
    pub fn remove(&self, owner: OwnerId) {
        let removed = {
            let mut items = self.lock();
            let mut removed = Vec::new();
            items.retain(|item| {
                if item.owner() == Some(owner) {
                    removed.push(item.clone());
                    false
                } else {
                    true
                }
            });
            removed
        };
        if !removed.is_empty() {
            tracing::debug!(?owner, count = removed.len(), "resources removed");
        }
        for item in removed {
            item.cleanup();
        }
    }

    /// Cleans up and evicts every box, regardless of owner.
    ///
    /// Runs automatically when the pool is dropped.
    pub fn cleanup(&self) {
        let drained: Vec<_> = self.lock().drain(..).collect();
        if !drained.is_empty() {
            tracing::debug!(count = drained.len(), "pool cleaned up");
        }
        for item in drained {
            item.cleanup();
        }
    }

    /// The number of boxes currently present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no boxes are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn ResourceBox>>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for ResourcePool {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl fmt::Debug for ResourcePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("len", &self.len())
            .finish()
    }
}
