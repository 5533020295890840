// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The type-erased routing surface and its ordered composition.

use std::fmt;
use std::sync::Arc;

use trellis_event::EventKey;
use trellis_source::{SharedSource, SourceId};

use crate::ErasedAction;

/// One `(source, key, resolver)` triple reported by a routing surface.
///
/// Obtaining an entry forces nothing; calling `resolve` evaluates the
/// underlying producers at that moment. This is the introspection surface the
/// handler binding walks to attach native registrations.
pub struct RouteEntry {
    /// The live source this entry is bound to.
    pub source: SharedSource,
    /// The event key this entry responds to.
    pub key: EventKey,
    /// Resolves the entry's actions at call time.
    pub resolve: Arc<dyn Fn() -> Vec<ErasedAction> + Send + Sync>,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("source", &SourceId::of(&self.source))
            .field("key", &self.key)
            .finish()
    }
}

/// A queryable, type-erased event-to-action surface.
///
/// Implemented by [`ActionTable`](crate::ActionTable) for a single source and
/// by [`ActionRouter`] for ordered compositions; a router nests inside another
/// router the same way a table does.
pub trait EventRouting: Send + Sync {
    /// Resolves the actions for `(source, key)` at call time.
    ///
    /// Sources match by identity. No match resolves to an empty list, never an
    /// error.
    fn resolve(&self, source: &SharedSource, key: &EventKey) -> Vec<ErasedAction>;

    /// Every `(source, key, resolver)` entry, in declaration order.
    ///
    /// Entries whose source is no longer alive are omitted.
    fn entries(&self) -> Vec<RouteEntry>;

    /// Every live source, unique by identity, in first-declaration order.
    ///
    /// This never evaluates producers; it is the cheap surface used for state
    /// fan-out.
    fn sources(&self) -> Vec<SharedSource>;
}

/// An ordered composition of routing surfaces.
///
/// Composition never reorders: `resolve` concatenates per-table results in
/// the order tables were added, so multi-action dispatch order is
/// deterministic.
#[derive(Clone, Default)]
pub struct ActionRouter {
    tables: Vec<Arc<dyn EventRouting>>,
}

impl ActionRouter {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a routing surface, builder style.
    #[must_use]
    pub fn with(mut self, routing: impl EventRouting + 'static) -> Self {
        self.push(routing);
        self
    }

    /// Adds a routing surface.
    pub fn push(&mut self, routing: impl EventRouting + 'static) {
        self.tables.push(Arc::new(routing));
    }

    /// Adds an already-shared routing surface.
    pub fn push_shared(&mut self, routing: Arc<dyn EventRouting>) {
        self.tables.push(routing);
    }

    /// The number of directly held surfaces (not flattened).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no surfaces are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl EventRouting for ActionRouter {
    fn resolve(&self, source: &SharedSource, key: &EventKey) -> Vec<ErasedAction> {
        self.tables
            .iter()
            .flat_map(|t| t.resolve(source, key))
            .collect()
    }

    fn entries(&self) -> Vec<RouteEntry> {
        self.tables.iter().flat_map(|t| t.entries()).collect()
    }

    fn sources(&self) -> Vec<SharedSource> {
        let mut seen = Vec::new();
        let mut out = Vec::new();
        for source in self.tables.iter().flat_map(|t| t.sources()) {
            let id = SourceId::of(&source);
            if !seen.contains(&id) {
                seen.push(id);
                out.push(source);
            }
        }
        out
    }
}

impl fmt::Debug for ActionRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRouter")
            .field("tables", &self.tables.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionTable, Mapping};
    use trellis_event::ControlEvent;
    use trellis_source::sim::SimControl;

    fn key() -> EventKey {
        ControlEvent::PRIMARY.into()
    }

    fn downcast_all(actions: Vec<ErasedAction>) -> Vec<&'static str> {
        actions
            .into_iter()
            .filter_map(|a| a.downcast::<&'static str>().ok().map(|s| *s))
            .collect()
    }

    #[test]
    fn flattening_preserves_declaration_order() {
        let source: SharedSource = SimControl::new();
        let first = ActionTable::new(
            &source,
            Mapping::new().on(ControlEvent::PRIMARY, || vec!["first"]),
        );
        let second = ActionTable::new(
            &source,
            Mapping::new().on(ControlEvent::PRIMARY, || vec!["second"]),
        );
        let router = ActionRouter::new().with(first).with(second);
        assert_eq!(
            downcast_all(router.resolve(&source, &key())),
            vec!["first", "second"]
        );
    }

    #[test]
    fn nested_routers_flatten_in_order() {
        let source: SharedSource = SimControl::new();
        let inner = ActionRouter::new().with(ActionTable::new(
            &source,
            Mapping::new().on(ControlEvent::PRIMARY, || vec!["inner"]),
        ));
        let outer = ActionRouter::new()
            .with(ActionTable::new(
                &source,
                Mapping::new().on(ControlEvent::PRIMARY, || vec!["outer"]),
            ))
            .with(inner);
        assert_eq!(
            downcast_all(outer.resolve(&source, &key())),
            vec!["outer", "inner"]
        );
        assert_eq!(outer.entries().len(), 2);
    }

    #[test]
    fn sources_are_unique_by_identity_and_never_forced() {
        let a: SharedSource = SimControl::new();
        let b: SharedSource = SimControl::new();
        let forced = |name: &'static str| -> Vec<&'static str> {
            panic!("producer {name} must not run during sources()")
        };
        let router = ActionRouter::new()
            .with(ActionTable::new(
                &a,
                Mapping::new().on(ControlEvent::PRIMARY, move || forced("a")),
            ))
            .with(ActionTable::new(
                &b,
                Mapping::new().on(ControlEvent::PRIMARY, move || forced("b")),
            ))
            .with(ActionTable::new(
                &a,
                Mapping::new().on(ControlEvent::VALUE_CHANGED, move || forced("a2")),
            ));

        let sources = router.sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(SourceId::of(&sources[0]), SourceId::of(&a));
        assert_eq!(SourceId::of(&sources[1]), SourceId::of(&b));
    }

    #[test]
    fn resolve_against_unknown_source_is_empty() {
        let a: SharedSource = SimControl::new();
        let other: SharedSource = SimControl::new();
        let router = ActionRouter::new().with(ActionTable::new(
            &a,
            Mapping::new().on(ControlEvent::PRIMARY, || vec!["x"]),
        ));
        assert!(router.resolve(&other, &key()).is_empty());
    }
}
