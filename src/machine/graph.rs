//! Ownership of the transition set.

use crate::core::{EqualityPolicy, Transition};

/// The set of registered transitions, in insertion order.
///
/// Set membership is computed through the active identifier policies, never
/// through `PartialEq` on the identifier types. Endpoint validation against
/// the state registry is the facade's job; the graph only owns the edges.
pub struct TransitionGraph<I, T> {
    entries: Vec<Transition<I, T>>,
}

impl<I: Clone, T: Clone> Default for TransitionGraph<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone, T: Clone> TransitionGraph<I, T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert an edge. Duplicate inserts are idempotent; returns whether the
    /// edge was newly added.
    pub fn add(
        &mut self,
        transition: Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        if self.contains(&transition, state_eq, trigger_eq) {
            return false;
        }
        self.entries.push(transition);
        true
    }

    /// Drop an edge; returns whether it was present.
    pub fn remove(
        &mut self,
        transition: &Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|t| t.matches(transition, state_eq, trigger_eq))
        else {
            return false;
        };
        self.entries.remove(pos);
        true
    }

    pub fn contains(
        &self,
        transition: &Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        self.entries
            .iter()
            .any(|t| t.matches(transition, state_eq, trigger_eq))
    }

    /// All edges leaving `from` on `trigger`, in insertion order.
    pub fn matching_from(
        &self,
        from: &I,
        trigger: &T,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> Vec<Transition<I, T>> {
        self.entries
            .iter()
            .filter(|t| {
                state_eq.equivalent(&t.from, from) && trigger_eq.equivalent(&t.trigger, trigger)
            })
            .cloned()
            .collect()
    }

    /// All edges with `id` as either endpoint.
    pub fn related_to(&self, id: &I, state_eq: &dyn EqualityPolicy<I>) -> Vec<Transition<I, T>> {
        self.entries
            .iter()
            .filter(|t| t.touches(id, state_eq))
            .cloned()
            .collect()
    }

    /// Drop every edge touching `id`; returns the removed edges so the
    /// facade can cascade their guards.
    pub fn remove_related(
        &mut self,
        id: &I,
        state_eq: &dyn EqualityPolicy<I>,
    ) -> Vec<Transition<I, T>> {
        let mut removed = Vec::new();
        self.entries.retain(|t| {
            if t.touches(id, state_eq) {
                removed.push(t.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// All edges in insertion order.
    pub fn all(&self) -> Vec<Transition<I, T>> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-establish set semantics after an equality policy swap: edges that
    /// became equivalent are collapsed onto their first occurrence. Returns
    /// `(kept, removed)` pairs so the facade can merge guard lists.
    pub fn dedup(
        &mut self,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> Vec<(Transition<I, T>, Transition<I, T>)> {
        let mut kept: Vec<Transition<I, T>> = Vec::new();
        let mut collapsed = Vec::new();
        for transition in self.entries.drain(..) {
            match kept
                .iter()
                .find(|k| k.matches(&transition, state_eq, trigger_eq))
            {
                Some(existing) => collapsed.push((existing.clone(), transition)),
                None => kept.push(transition),
            }
        }
        self.entries = kept;
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NaturalEquality;

    fn graph_with(edges: &[(u32, u32, u32)]) -> TransitionGraph<u32, u32> {
        let mut graph = TransitionGraph::new();
        for &(from, trigger, to) in edges {
            graph.add(
                Transition::new(from, trigger, to),
                &NaturalEquality,
                &NaturalEquality,
            );
        }
        graph
    }

    #[test]
    fn duplicate_adds_are_idempotent() {
        let mut graph = graph_with(&[(1, 0, 2)]);
        assert!(!graph.add(
            Transition::new(1, 0, 2),
            &NaturalEquality,
            &NaturalEquality
        ));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn matching_from_preserves_insertion_order() {
        let graph = graph_with(&[(1, 0, 3), (1, 1, 2), (1, 0, 2), (2, 0, 1)]);
        let matched = graph.matching_from(&1, &0, &NaturalEquality, &NaturalEquality);
        let targets: Vec<u32> = matched.iter().map(|t| t.to).collect();
        assert_eq!(targets, vec![3, 2]);
    }

    #[test]
    fn related_to_covers_both_endpoints() {
        let graph = graph_with(&[(1, 0, 2), (2, 0, 3), (3, 0, 1), (2, 1, 3)]);
        let related = graph.related_to(&1, &NaturalEquality);
        assert_eq!(related.len(), 2);
    }

    #[test]
    fn remove_related_returns_the_dropped_edges() {
        let mut graph = graph_with(&[(1, 0, 2), (2, 0, 3), (3, 0, 1)]);
        let removed = graph.remove_related(&1, &NaturalEquality);
        assert_eq!(removed.len(), 2);
        assert_eq!(graph.len(), 1);
        assert!(graph.contains(
            &Transition::new(2, 0, 3),
            &NaturalEquality,
            &NaturalEquality
        ));
    }

    struct ModuloTen;

    impl EqualityPolicy<u32> for ModuloTen {
        fn equivalent(&self, a: &u32, b: &u32) -> bool {
            a % 10 == b % 10
        }
    }

    #[test]
    fn dedup_collapses_edges_under_a_new_policy() {
        let mut graph = graph_with(&[(1, 0, 2), (11, 0, 12), (3, 0, 4)]);
        let collapsed = graph.dedup(&ModuloTen, &NaturalEquality);
        assert_eq!(collapsed.len(), 1);
        assert_eq!(graph.len(), 2);
        let (kept, removed) = &collapsed[0];
        assert_eq!(kept.from, 1);
        assert_eq!(removed.from, 11);
    }
}
