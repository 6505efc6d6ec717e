//! Cogwheel: an embeddable finite-state-machine runtime.
//!
//! A host registers behaviour objects under opaque state ids, connects them
//! with `(from, trigger, to)` transitions gated by guard predicates, and
//! drives the machine through `start` / `stop` / `update` / `trigger` /
//! `send_event`. The engine guarantees:
//!
//! - **Deterministic resolution**: candidates for a trigger are scanned in
//!   insertion order, and exactly one guard-valid transition may win; two or
//!   more is an error, never resolved by priority.
//! - **Queued re-entrant triggering**: a state's own enter or exit callback
//!   may trigger further transitions; requests are queued FIFO and drained
//!   in a loop, so chained immediate transitions never deepen the stack.
//! - **Lifecycle discipline**: a phase machine tracks what the engine is
//!   doing (starting, evaluating guards, transitioning, stopping) and
//!   rejects mutations that would invalidate the work in flight, such as
//!   removing the destination of an in-flight transition.
//!
//! # Example
//!
//! ```rust
//! use cogwheel::{Guard, MachineResult, StateBehavior, StateMachine, Transition};
//!
//! struct Lamp;
//! impl StateBehavior<&'static str, &'static str> for Lamp {}
//!
//! # fn main() -> MachineResult<()> {
//! let mut machine: StateMachine<&'static str, &'static str> = StateMachine::new();
//! machine.add_state("off", Lamp)?;
//! machine.add_state("on", Lamp)?;
//! machine.add_transition(Transition::new("off", "flip", "on"))?;
//! machine.add_transition(Transition::new("on", "flip", "off"))?;
//!
//! machine.start()?;
//! assert_eq!(machine.current_state(), Some(&"off"));
//!
//! machine.trigger("flip")?;
//! assert_eq!(machine.current_state(), Some(&"on"));
//!
//! machine.stop()?;
//! assert!(!machine.is_started());
//! # Ok(())
//! # }
//! ```
//!
//! The machine is single-threaded and cooperative; concurrent access from
//! multiple threads is not supported, and the host is expected to serialize
//! all calls (for example through its own scheduler tick).

pub mod core;
pub mod error;
pub mod machine;

pub use crate::core::{
    EqualityPolicy, EventHandler, Guard, HandlerRef, Journal, NaturalEquality, StateBehavior,
    StateRef, Transition, TransitionObserver, TransitionRecord,
};
pub use crate::error::{MachineError, MachineResult};
pub use crate::machine::StateMachine;
