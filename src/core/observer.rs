//! Transition notifications.

use crate::error::MachineResult;
use std::fmt;
use std::rc::Rc;

/// Observer invoked around a state change with `(previous, trigger, next)`.
///
/// The machine keeps two ordered observer lists, one raised before the
/// exit/enter sequence of a confirmed transition and one after the current
/// state pointer has moved. Every observer in a list runs even if an earlier
/// one fails; captured failures are re-raised together once the sequence
/// completes.
///
/// Like [`Guard`](crate::Guard), observers compare by handle identity so they
/// can be removed again.
pub struct TransitionObserver<I, T> {
    callback: Rc<dyn Fn(&I, &T, &I) -> MachineResult<()>>,
}

impl<I, T> TransitionObserver<I, T> {
    /// Observer from a fallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&I, &T, &I) -> MachineResult<()> + 'static,
    {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Observer from an infallible callback.
    pub fn notify<F>(callback: F) -> Self
    where
        F: Fn(&I, &T, &I) + 'static,
    {
        Self::new(move |from, trigger, to| {
            callback(from, trigger, to);
            Ok(())
        })
    }

    pub(crate) fn call(&self, from: &I, trigger: &T, to: &I) -> MachineResult<()> {
        (self.callback)(from, trigger, to)
    }
}

impl<I, T> Clone for TransitionObserver<I, T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<I, T> PartialEq for TransitionObserver<I, T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<I, T> fmt::Debug for TransitionObserver<I, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionObserver").finish_non_exhaustive()
    }
}
