//! The directed edge of the transition graph.

use super::identity::EqualityPolicy;
use std::fmt::Debug;

/// Immutable `(from, trigger, to)` triple describing one edge of the state
/// graph.
///
/// Transitions deliberately do not implement `PartialEq`: whether two
/// transitions are the same edge depends on the injected identifier
/// policies, so comparison always goes through [`Transition::matches`].
///
/// # Example
///
/// ```rust
/// use cogwheel::core::{NaturalEquality, Transition};
///
/// let a = Transition::new("closed", 1, "open");
/// let b = Transition::new("closed", 1, "open");
/// assert!(a.matches(&b, &NaturalEquality, &NaturalEquality));
/// ```
#[derive(Clone, Debug)]
pub struct Transition<I, T> {
    /// Source state id.
    pub from: I,
    /// Trigger that fires this transition.
    pub trigger: T,
    /// Destination state id.
    pub to: I,
}

impl<I, T> Transition<I, T> {
    /// Create a transition edge.
    pub fn new(from: I, trigger: T, to: I) -> Self {
        Self { from, trigger, to }
    }

    /// Structural equality under the active identifier policies.
    pub fn matches(
        &self,
        other: &Transition<I, T>,
        state_eq: &dyn EqualityPolicy<I>,
        trigger_eq: &dyn EqualityPolicy<T>,
    ) -> bool {
        state_eq.equivalent(&self.from, &other.from)
            && trigger_eq.equivalent(&self.trigger, &other.trigger)
            && state_eq.equivalent(&self.to, &other.to)
    }

    /// Whether either endpoint of this transition is `id`.
    pub fn touches(&self, id: &I, state_eq: &dyn EqualityPolicy<I>) -> bool {
        state_eq.equivalent(&self.from, id) || state_eq.equivalent(&self.to, id)
    }
}
