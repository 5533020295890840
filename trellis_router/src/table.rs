// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Action tables: one source identity bound to a merged mapping.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use trellis_event::EventKey;
use trellis_source::{SharedSource, SourceId, WeakSource};

use crate::mapping::{Mapping, ProducerList};
use crate::router::{EventRouting, RouteEntry};
use crate::ErasedAction;

/// Binds one input-source identity to a lazily-evaluated event mapping.
///
/// The table holds its source weakly and captures the source's identity at
/// construction. Queries match on identity: a different source — even of the
/// same concrete type — resolves to nothing, and a dead source resolves to
/// nothing. Neither case is an error.
pub struct ActionTable<A> {
    source: WeakSource,
    source_id: SourceId,
    index: HashMap<EventKey, ProducerList<A>>,
    /// Keys in first-declaration order, for deterministic introspection.
    order: Vec<EventKey>,
}

impl<A> ActionTable<A> {
    /// Builds a table binding `source`'s identity to `mapping`.
    #[must_use]
    pub fn new(source: &SharedSource, mapping: Mapping<A>) -> Self {
        let mut index = HashMap::new();
        let mut order = Vec::new();
        for (key, producers) in mapping.into_entries() {
            order.push(key);
            index.insert(key, producers);
        }
        Self {
            source: Arc::downgrade(source),
            source_id: SourceId::of(source),
            index,
            order,
        }
    }

    /// The identity this table is bound to.
    #[must_use]
    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Resolves the actions for `(source, key)`, in declaration order.
    ///
    /// Producers run on every call; nothing is cached. Identity mismatches,
    /// unknown keys, and a dead source all resolve to an empty list.
    #[must_use]
    pub fn actions(&self, source: &SharedSource, key: &EventKey) -> Vec<A> {
        if SourceId::of(source) != self.source_id || self.source.upgrade().is_none() {
            return Vec::new();
        }
        match self.index.get(key) {
            Some(producers) => producers.iter().flat_map(|p| p()).collect(),
            None => Vec::new(),
        }
    }
}

impl<A: Send + 'static> EventRouting for ActionTable<A> {
    fn resolve(&self, source: &SharedSource, key: &EventKey) -> Vec<ErasedAction> {
        self.actions(source, key)
            .into_iter()
            .map(|a| Box::new(a) as ErasedAction)
            .collect()
    }

    fn entries(&self) -> Vec<RouteEntry> {
        let Some(source) = self.source.upgrade() else {
            return Vec::new();
        };
        self.order
            .iter()
            .map(|key| {
                let producers = self.index[key].clone();
                RouteEntry {
                    source: source.clone(),
                    key: *key,
                    resolve: Arc::new(move || {
                        producers
                            .iter()
                            .flat_map(|p| p())
                            .map(|a| Box::new(a) as ErasedAction)
                            .collect()
                    }),
                }
            })
            .collect()
    }

    fn sources(&self) -> Vec<SharedSource> {
        self.source.upgrade().into_iter().collect()
    }
}

impl<A> fmt::Debug for ActionTable<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTable")
            .field("source_id", &self.source_id)
            .field("keys", &self.order)
            .finish()
    }
}
