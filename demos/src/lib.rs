// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared scaffolding for the Trellis demo programs.

use std::sync::{Arc, Mutex};

use trellis_binding::ActionHandler;

/// An action handler that prints and records everything it receives.
///
/// The demos use it as the single sink for whatever action enum the demo
/// component emits.
pub struct PrintingHandler<A> {
    label: &'static str,
    received: Mutex<Vec<A>>,
}

impl<A: std::fmt::Debug + Send + 'static> PrintingHandler<A> {
    /// Creates a handler that prefixes its output with `label`.
    #[must_use]
    pub fn new(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            received: Mutex::new(Vec::new()),
        })
    }

    /// The number of actions received so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.received.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl<A: std::fmt::Debug + Send + Sync + 'static> ActionHandler for PrintingHandler<A> {
    type Action = A;

    fn handle(&self, action: A) {
        println!("[{}] {action:?}", self.label);
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(action);
    }
}
