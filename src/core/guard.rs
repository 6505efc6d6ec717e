//! Guard predicates gating transitions.

use std::fmt;
use std::rc::Rc;

/// Predicate deciding whether a transition is currently allowed to fire.
///
/// A guard is a cheap handle around a shared closure. Cloning shares the
/// underlying predicate, and equality is handle identity: a clone compares
/// equal to its original, while two guards built from the same closure
/// expression do not. This identity is what `remove`/`contains` operate on.
///
/// Multiple guards on one transition are AND-ed in registration order, and
/// evaluation stops at the first guard that returns false.
///
/// # Example
///
/// ```rust
/// use cogwheel::Guard;
///
/// let armed = Guard::<u32, u32>::new(|| true);
/// let same = armed.clone();
/// assert_eq!(armed, same);
///
/// let contextual = Guard::for_transition(|from: &u32, _trigger: &u32, to: &u32| from < to);
/// assert!(contextual.check(&1, &0, &2));
/// assert!(!contextual.check(&2, &0, &1));
/// ```
pub struct Guard<I, T> {
    predicate: Rc<dyn Fn(&I, &T, &I) -> bool>,
}

impl<I, T> Guard<I, T> {
    /// Guard from a zero-argument predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self {
            predicate: Rc::new(move |_, _, _| predicate()),
        }
    }

    /// Guard that inspects the `(from, trigger, to)` triple being resolved.
    pub fn for_transition<F>(predicate: F) -> Self
    where
        F: Fn(&I, &T, &I) -> bool + 'static,
    {
        Self {
            predicate: Rc::new(predicate),
        }
    }

    /// Evaluate the predicate. Results are never memoized; guards may read
    /// external state.
    pub fn check(&self, from: &I, trigger: &T, to: &I) -> bool {
        (self.predicate)(from, trigger, to)
    }
}

impl<I, T> Clone for Guard<I, T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<I, T> PartialEq for Guard<I, T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.predicate, &other.predicate)
    }
}

impl<I, T> fmt::Debug for Guard<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
