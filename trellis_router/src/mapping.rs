// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping builder: ordered `EventKey → producer` declarations for one source.

use std::fmt;
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};
use trellis_event::EventKey;

/// A zero-argument producer resolving the actions for one table entry.
///
/// Stored as declared and evaluated on every trigger; results are never
/// cached across calls.
pub type ActionProducer<A> = Arc<dyn Fn() -> Vec<A> + Send + Sync>;

pub(crate) type ProducerList<A> = SmallVec<[ActionProducer<A>; 1]>;

/// An ordered builder of `EventKey → producer` entries.
///
/// Declaring the same key twice does not replace the earlier producer: the
/// producers are concatenated, and resolution returns the earlier producer's
/// actions followed by the later one's. The same rule applies to
/// [`Mapping::merge`], associatively, for any number of mappings.
///
/// ```
/// use trellis_event::ControlEvent;
/// use trellis_router::Mapping;
///
/// let mut first = Mapping::new().on(ControlEvent::PRIMARY, || vec!["a"]);
/// let second = Mapping::new().on(ControlEvent::PRIMARY, || vec!["b"]);
/// first.merge(second);
///
/// // One key, two producers, declaration order preserved.
/// assert_eq!(first.len(), 1);
/// ```
pub struct Mapping<A> {
    entries: Vec<(EventKey, ProducerList<A>)>,
}

impl<A> Mapping<A> {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a producer for `key`.
    ///
    /// If `key` was already declared, the new producer's actions are
    /// concatenated after the existing ones at resolution time.
    #[must_use]
    pub fn on(
        mut self,
        key: impl Into<EventKey>,
        producer: impl Fn() -> Vec<A> + Send + Sync + 'static,
    ) -> Self {
        self.push(key.into(), Arc::new(producer));
        self
    }

    /// Merges `other` into this mapping, key by key.
    ///
    /// Colliding keys concatenate producers; `other`'s producers resolve after
    /// the ones already present. New keys keep `other`'s declaration order.
    pub fn merge(&mut self, other: Self) {
        for (key, producers) in other.entries {
            for producer in producers {
                self.push(key, producer);
            }
        }
    }

    /// The number of distinct keys declared.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no keys are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, key: EventKey, producer: ActionProducer<A>) {
        if let Some((_, producers)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            producers.push(producer);
        } else {
            self.entries.push((key, smallvec![producer]));
        }
    }

    pub(crate) fn into_entries(self) -> Vec<(EventKey, ProducerList<A>)> {
        self.entries
    }
}

impl<A> Default for Mapping<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Mapping<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("keys", &self.entries.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_event::ControlEvent;

    fn resolve_all<A>(mapping: &Mapping<A>, key: EventKey) -> Vec<A> {
        mapping
            .entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, producers)| producers.iter().flat_map(|p| p()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn colliding_keys_concatenate_in_declaration_order() {
        let mapping = Mapping::new()
            .on(ControlEvent::PRIMARY, || vec!['a'])
            .on(ControlEvent::PRIMARY, || vec!['b']);
        assert_eq!(mapping.len(), 1);
        assert_eq!(
            resolve_all(&mapping, ControlEvent::PRIMARY.into()),
            vec!['a', 'b']
        );
    }

    #[test]
    fn merge_concatenates_not_replaces() {
        let mut left = Mapping::new().on(ControlEvent::PRIMARY, || vec!["A"]);
        let right = Mapping::new().on(ControlEvent::PRIMARY, || vec!["B"]);
        left.merge(right);
        assert_eq!(
            resolve_all(&left, ControlEvent::PRIMARY.into()),
            vec!["A", "B"]
        );
    }

    #[test]
    fn three_way_merge_is_associative() {
        let make = |s: &'static str| Mapping::new().on(ControlEvent::PRIMARY, move || vec![s]);

        // (a + b) + c
        let mut ab = make("a");
        ab.merge(make("b"));
        let mut ab_c = ab;
        ab_c.merge(make("c"));

        // a + (b + c)
        let mut bc = make("b");
        bc.merge(make("c"));
        let mut a_bc = make("a");
        a_bc.merge(bc);

        let key: EventKey = ControlEvent::PRIMARY.into();
        assert_eq!(resolve_all(&ab_c, key), vec!["a", "b", "c"]);
        assert_eq!(resolve_all(&a_bc, key), vec!["a", "b", "c"]);
    }

    #[test]
    fn distinct_keys_stay_distinct() {
        let mapping = Mapping::new()
            .on(ControlEvent::PRIMARY, || vec![1])
            .on(ControlEvent::VALUE_CHANGED, || vec![2]);
        assert_eq!(mapping.len(), 2);
        assert_eq!(resolve_all(&mapping, ControlEvent::PRIMARY.into()), vec![1]);
        assert_eq!(
            resolve_all(&mapping, ControlEvent::VALUE_CHANGED.into()),
            vec![2]
        );
    }
}
