//! Ownership of registered states.

use crate::core::{EqualityPolicy, StateRef};
use crate::error::{MachineError, MachineResult};
use std::fmt::Debug;

/// The single source of truth mapping state id to state object.
///
/// Entries are kept in insertion order and compared through the injected
/// [`EqualityPolicy`], so no `Eq`/`Hash` bound is placed on identifiers. The
/// registry also tracks the initial state: the first state ever added becomes
/// initial unless the host overrides it, and removing the last state clears
/// it.
pub struct StateRegistry<I, T, E = ()> {
    entries: Vec<(I, StateRef<I, T, E>)>,
    initial: Option<I>,
}

impl<I, T, E> Default for StateRegistry<I, T, E>
where
    I: Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T, E> StateRegistry<I, T, E>
where
    I: Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            initial: None,
        }
    }

    /// Register a state. Fails with [`MachineError::DuplicateState`] when the
    /// id is already present under the active policy.
    pub fn add(&mut self, id: I, state: StateRef<I, T, E>, eq: &dyn EqualityPolicy<I>) -> MachineResult<()> {
        if self.position(&id, eq).is_some() {
            return Err(MachineError::DuplicateState {
                id: format!("{id:?}"),
            });
        }
        if self.entries.is_empty() && self.initial.is_none() {
            self.initial = Some(id.clone());
        }
        self.entries.push((id, state));
        Ok(())
    }

    /// Drop a state. Returns false when the id was absent. Clears the
    /// initial state when the registry becomes empty.
    pub fn remove(&mut self, id: &I, eq: &dyn EqualityPolicy<I>) -> bool {
        let Some(pos) = self.position(id, eq) else {
            return false;
        };
        self.entries.remove(pos);
        if self.entries.is_empty() {
            self.initial = None;
        }
        true
    }

    /// Look up a state handle by id.
    pub fn get(&self, id: &I, eq: &dyn EqualityPolicy<I>) -> MachineResult<StateRef<I, T, E>> {
        self.position(id, eq)
            .map(|pos| self.entries[pos].1.clone())
            .ok_or_else(|| MachineError::StateNotFound {
                id: format!("{id:?}"),
            })
    }

    /// Membership test; never fails.
    pub fn contains(&self, id: &I, eq: &dyn EqualityPolicy<I>) -> bool {
        self.position(id, eq).is_some()
    }

    /// Registered ids in insertion order.
    pub fn ids(&self) -> Vec<I> {
        self.entries.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn initial(&self) -> Option<&I> {
        self.initial.as_ref()
    }

    /// Override the initial state. The caller validates membership.
    pub fn set_initial(&mut self, id: I) {
        self.initial = Some(id);
    }

    fn position(&self, id: &I, eq: &dyn EqualityPolicy<I>) -> Option<usize> {
        self.entries.iter().position(|(k, _)| eq.equivalent(k, id))
    }
}
