//! Per-state event handler lists.

use crate::core::{EqualityPolicy, HandlerRef};

/// Ordered event handler sets keyed by state id.
///
/// Dispatch walks the active state's handlers in registration order until one
/// consumes the event. Subscription is set-semantics over handler identity.
/// State existence checks are the facade's job.
pub struct EventRouter<I, E> {
    entries: Vec<(I, Vec<HandlerRef<E>>)>,
}

impl<I: Clone, E> Default for EventRouter<I, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone, E> EventRouter<I, E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Attach a handler to a state; duplicate subscription is a no-op.
    /// Returns whether the handler was newly attached.
    pub fn subscribe(&mut self, id: &I, handler: HandlerRef<E>, eq: &dyn EqualityPolicy<I>) -> bool {
        match self.position(id, eq) {
            Some(pos) => {
                let handlers = &mut self.entries[pos].1;
                if handlers.contains(&handler) {
                    return false;
                }
                handlers.push(handler);
                true
            }
            None => {
                self.entries.push((id.clone(), vec![handler]));
                true
            }
        }
    }

    /// Detach a handler; returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: &I, handler: &HandlerRef<E>, eq: &dyn EqualityPolicy<I>) -> bool {
        let Some(pos) = self.position(id, eq) else {
            return false;
        };
        let handlers = &mut self.entries[pos].1;
        let Some(at) = handlers.iter().position(|h| h == handler) else {
            return false;
        };
        handlers.remove(at);
        if handlers.is_empty() {
            self.entries.remove(pos);
        }
        true
    }

    pub fn has_handler(&self, id: &I, handler: &HandlerRef<E>, eq: &dyn EqualityPolicy<I>) -> bool {
        self.position(id, eq)
            .is_some_and(|pos| self.entries[pos].1.contains(handler))
    }

    pub fn has_any_handler(&self, id: &I, eq: &dyn EqualityPolicy<I>) -> bool {
        self.position(id, eq).is_some()
    }

    /// The state's handlers in registration order.
    pub fn handlers_of(&self, id: &I, eq: &dyn EqualityPolicy<I>) -> Vec<HandlerRef<E>> {
        self.position(id, eq)
            .map(|pos| self.entries[pos].1.clone())
            .unwrap_or_default()
    }

    /// Drop every handler of a removed state.
    pub fn drop_for(&mut self, id: &I, eq: &dyn EqualityPolicy<I>) {
        if let Some(pos) = self.position(id, eq) {
            self.entries.remove(pos);
        }
    }

    fn position(&self, id: &I, eq: &dyn EqualityPolicy<I>) -> Option<usize> {
        self.entries.iter().position(|(k, _)| eq.equivalent(k, id))
    }
}
