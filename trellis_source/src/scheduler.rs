// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! UI-thread marshaling.
//!
//! Native registration side effects and callback invocation belong on one
//! designated UI thread. Hosts provide a [`Scheduler`] that knows whether the
//! caller is already there and can post fire-and-forget work when it is not.
//! There is no cancellation and no completion signal: once posted, a task runs
//! to completion.

use std::sync::Arc;

/// Marshals work onto the host's UI thread.
pub trait Scheduler: Send + Sync {
    /// Returns `true` if the calling thread is the UI thread.
    fn is_ui_thread(&self) -> bool;

    /// Queues `task` to run on the UI thread. Fire-and-forget: the call does
    /// not wait for the task.
    fn post(&self, task: Box<dyn FnOnce() + Send>);
}

/// Runs `task` inline when already on the UI thread, otherwise posts it.
pub fn run_on_ui(scheduler: &Arc<dyn Scheduler>, task: impl FnOnce() + Send + 'static) {
    if scheduler.is_ui_thread() {
        task();
    } else {
        scheduler.post(Box::new(task));
    }
}

/// A scheduler that treats the current thread as the UI thread.
///
/// Every post runs inline. This is the default for tests, demos, and hosts
/// that only ever call the engine from their event loop.
#[derive(Copy, Clone, Debug, Default)]
pub struct InlineScheduler;

impl Scheduler for InlineScheduler {
    fn is_ui_thread(&self) -> bool {
        true
    }

    fn post(&self, task: Box<dyn FnOnce() + Send>) {
        task();
    }
}
