//! Association of guard conditions with transitions.

use crate::core::{EqualityPolicy, Guard, Transition};

/// Ordered guard lists keyed by transition.
///
/// Guards on one transition are AND-ed: the transition is valid when every
/// guard evaluates true, and trivially valid when none are registered.
/// Evaluation runs in registration order and stops at the first false guard;
/// results are never cached. Guard membership is handle identity (see
/// [`Guard`]); adding the same handle twice is a no-op.
pub struct GuardRegistry<I, T> {
    entries: Vec<(Transition<I, T>, Vec<Guard<I, T>>)>,
}

impl<I: Clone, T: Clone> Default for GuardRegistry<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone, T: Clone> GuardRegistry<I, T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Attach a guard; returns whether it was newly added. The facade
    /// validates that the transition is registered first.
    pub fn add(
        &mut self,
        transition: &Transition<I, T>,
        guard: Guard<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        match self.position(transition, state_eq, trigger_eq) {
            Some(pos) => {
                let guards = &mut self.entries[pos].1;
                if guards.contains(&guard) {
                    return false;
                }
                guards.push(guard);
                true
            }
            None => {
                self.entries.push((transition.clone(), vec![guard]));
                true
            }
        }
    }

    /// Detach a guard; returns whether it was present.
    pub fn remove(
        &mut self,
        transition: &Transition<I, T>,
        guard: &Guard<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        let Some(pos) = self.position(transition, state_eq, trigger_eq) else {
            return false;
        };
        let guards = &mut self.entries[pos].1;
        let Some(at) = guards.iter().position(|g| g == guard) else {
            return false;
        };
        guards.remove(at);
        if guards.is_empty() {
            self.entries.remove(pos);
        }
        true
    }

    pub fn contains(
        &self,
        transition: &Transition<I, T>,
        guard: &Guard<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        self.position(transition, state_eq, trigger_eq)
            .is_some_and(|pos| self.entries[pos].1.contains(guard))
    }

    /// Guards attached to a transition, in registration order.
    pub fn guards_of(
        &self,
        transition: &Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> Vec<Guard<I, T>> {
        self.position(transition, state_eq, trigger_eq)
            .map(|pos| self.entries[pos].1.clone())
            .unwrap_or_default()
    }

    /// Whether every guard on the transition currently evaluates true.
    pub fn all_valid(
        &self,
        transition: &Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        let Some(pos) = self.position(transition, state_eq, trigger_eq) else {
            return true;
        };
        self.entries[pos]
            .1
            .iter()
            .all(|g| g.check(&transition.from, &transition.trigger, &transition.to))
    }

    /// Drop every guard attached to a transition; returns whether any were.
    pub fn drop_for(
        &mut self,
        transition: &Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        let Some(pos) = self.position(transition, state_eq, trigger_eq) else {
            return false;
        };
        self.entries.remove(pos);
        true
    }

    /// Move the guards of `source` onto `target`, preserving order and set
    /// semantics. Used when an equality policy swap collapses two edges.
    pub fn merge(
        &mut self,
        source: &Transition<I, T>,
        target: &Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) {
        let Some(pos) = self.position(source, state_eq, trigger_eq) else {
            return;
        };
        let moved = self.entries.remove(pos).1;
        for guard in moved {
            self.add(target, guard, state_eq, trigger_eq);
        }
    }

    fn position(
        &self,
        transition: &Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> Option<usize> {
        self.entries
            .iter()
            .position(|(t, _)| t.matches(transition, state_eq, trigger_eq))
    }
}
