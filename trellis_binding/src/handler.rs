// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Action handlers and their type-erased wrapper.

use std::fmt;
use std::sync::Arc;

use trellis_pool::OwnerId;
use trellis_router::ErasedAction;

/// A consumer of one application-defined action type.
pub trait ActionHandler: Send + Sync + 'static {
    /// The action type this handler understands.
    type Action: Send + 'static;

    /// Handles one action.
    fn handle(&self, action: Self::Action);
}

/// A type-erased action handler.
///
/// Wraps a handler weakly — the binding never owns the handler — together
/// with a downcast-and-dispatch closure. Delivery silently drops actions
/// whose concrete type is not the handler's declared [`ActionHandler::Action`]
/// (several handler kinds may legitimately share one router), and is a no-op
/// once the handler itself is gone.
///
/// The wrapper remembers the wrapped handler's identity, which is the owner
/// tag its resource boxes are grouped under.
#[derive(Clone)]
pub struct AnyActionHandler {
    owner: OwnerId,
    deliver: Arc<dyn Fn(ErasedAction) + Send + Sync>,
}

impl AnyActionHandler {
    /// Erases `handler`.
    #[must_use]
    pub fn new<H: ActionHandler>(handler: &Arc<H>) -> Self {
        let owner = OwnerId::of(handler);
        let weak = Arc::downgrade(handler);
        let deliver = Arc::new(move |action: ErasedAction| {
            let Some(handler) = weak.upgrade() else {
                return;
            };
            if let Ok(action) = action.downcast::<H::Action>() {
                handler.handle(*action);
            }
        });
        Self { owner, deliver }
    }

    /// The identity of the wrapped handler.
    #[must_use]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Delivers one erased action, applying the type filter.
    pub fn deliver(&self, action: ErasedAction) {
        (self.deliver)(action);
    }
}

impl fmt::Debug for AnyActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyActionHandler")
            .field("owner", &self.owner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<i32>>);

    impl ActionHandler for Recorder {
        type Action = i32;
        fn handle(&self, action: i32) {
            self.0.lock().unwrap().push(action);
        }
    }

    #[test]
    fn delivers_matching_actions() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let erased = AnyActionHandler::new(&recorder);
        erased.deliver(Box::new(7_i32));
        erased.deliver(Box::new(8_i32));
        assert_eq!(*recorder.0.lock().unwrap(), vec![7, 8]);
    }

    #[test]
    fn drops_mismatched_actions_silently() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let erased = AnyActionHandler::new(&recorder);
        erased.deliver(Box::new("not an i32"));
        erased.deliver(Box::new(3_i64));
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn dead_handler_is_a_no_op() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let erased = AnyActionHandler::new(&recorder);
        drop(recorder);
        // Nothing to observe beyond "does not panic".
        erased.deliver(Box::new(1_i32));
    }

    #[test]
    fn owner_is_the_handler_identity() {
        let a = Arc::new(Recorder(Mutex::new(Vec::new())));
        let b = Arc::new(Recorder(Mutex::new(Vec::new())));
        assert_eq!(AnyActionHandler::new(&a).owner(), OwnerId::of(&a));
        assert_ne!(AnyActionHandler::new(&a).owner(), OwnerId::of(&b));
        // Re-erasing the same handler preserves identity.
        assert_eq!(
            AnyActionHandler::new(&a).owner(),
            AnyActionHandler::new(&a).owner()
        );
    }
}
