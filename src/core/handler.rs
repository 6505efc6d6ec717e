//! Event handlers routed to the active state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Capability for receiving events dispatched to a state.
///
/// Returning `true` marks the event as consumed and stops propagation to the
/// remaining handlers of that state.
pub trait EventHandler<E> {
    fn handle_event(&mut self, event: &E) -> bool;
}

/// Shared, identity-comparable handle to an event handler.
///
/// Subscription uses set semantics over this identity: subscribing the same
/// handle twice is a no-op, and the host unsubscribes with a clone of the
/// handle it subscribed.
///
/// # Example
///
/// ```rust
/// use cogwheel::HandlerRef;
///
/// let handler = HandlerRef::from_fn(|event: &String| event.as_str() == "quit");
/// assert!(handler != HandlerRef::from_fn(|event: &String| event.as_str() == "quit"));
/// assert_eq!(handler, handler.clone());
/// ```
pub struct HandlerRef<E> {
    inner: Rc<RefCell<dyn EventHandler<E>>>,
}

impl<E> HandlerRef<E> {
    /// Wrap an [`EventHandler`] implementation.
    pub fn new<H>(handler: H) -> Self
    where
        H: EventHandler<E> + 'static,
    {
        Self {
            inner: Rc::new(RefCell::new(handler)),
        }
    }

    /// Adapt a closure as a handler.
    pub fn from_fn<F>(handler: F) -> Self
    where
        F: FnMut(&E) -> bool + 'static,
    {
        Self::new(FnHandler(handler))
    }

    pub(crate) fn dispatch(&self, event: &E) -> bool {
        self.inner.borrow_mut().handle_event(event)
    }
}

impl<E> Clone for HandlerRef<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> PartialEq for HandlerRef<E> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E> fmt::Debug for HandlerRef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRef").finish_non_exhaustive()
    }
}

struct FnHandler<F>(F);

impl<E, F> EventHandler<E> for FnHandler<F>
where
    F: FnMut(&E) -> bool,
{
    fn handle_event(&mut self, event: &E) -> bool {
        (self.0)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_handlers_consume_or_pass() {
        let handler = HandlerRef::from_fn(|event: &u32| *event > 10);
        assert!(handler.dispatch(&11));
        assert!(!handler.dispatch(&3));
    }

    #[test]
    fn handlers_may_mutate_their_own_state() {
        let mut count = 0;
        let handler = HandlerRef::from_fn(move |_event: &u32| {
            count += 1;
            count >= 2
        });
        assert!(!handler.dispatch(&0));
        assert!(handler.dispatch(&0));
    }

    #[test]
    fn identity_follows_the_handle() {
        let a = HandlerRef::from_fn(|_: &u32| false);
        let b = a.clone();
        let c = HandlerRef::from_fn(|_: &u32| false);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
