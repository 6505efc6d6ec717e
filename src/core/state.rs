//! The state behaviour capability.

use crate::error::MachineResult;
use crate::machine::StateMachine;
use std::cell::RefCell;
use std::rc::Rc;

/// Behaviour of a single state.
///
/// All three callbacks default to no-ops, so a state with an empty body is
/// just an empty struct. Each callback receives the owning machine and may
/// call back into it; re-entrant `trigger` calls are queued and run after the
/// callback in flight returns, and the machine's lifecycle phase decides
/// which other calls are legal (see [`StateMachine`]).
///
/// A callback reports failure by returning an error, typically via
/// [`MachineError::callback`](crate::MachineError::callback).
///
/// # Example
///
/// ```rust
/// use cogwheel::{MachineResult, StateBehavior, StateMachine};
///
/// struct Announcer(&'static str);
///
/// impl StateBehavior<u32, u32> for Announcer {
///     fn on_enter(&mut self, _machine: &mut StateMachine<u32, u32>) -> MachineResult<()> {
///         println!("entered {}", self.0);
///         Ok(())
///     }
/// }
/// ```
pub trait StateBehavior<I, T, E = ()> {
    /// Called when this state becomes the active state.
    fn on_enter(&mut self, machine: &mut StateMachine<I, T, E>) -> MachineResult<()> {
        let _ = machine;
        Ok(())
    }

    /// Called when the host ticks the machine via `update`.
    fn on_update(&mut self, machine: &mut StateMachine<I, T, E>) -> MachineResult<()> {
        let _ = machine;
        Ok(())
    }

    /// Called when this state stops being the active state.
    fn on_exit(&mut self, machine: &mut StateMachine<I, T, E>) -> MachineResult<()> {
        let _ = machine;
        Ok(())
    }
}

/// Shared handle to a registered state.
///
/// The registry owns states through this handle; a host that keeps a clone
/// retains lookup access but no special powers over the lifecycle calls.
pub type StateRef<I, T, E = ()> = Rc<RefCell<dyn StateBehavior<I, T, E>>>;
