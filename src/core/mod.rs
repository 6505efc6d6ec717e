//! Core value types and capability traits: identifier equality, transition
//! edges, state behaviour, guards, event handlers, observers, and the
//! transition journal.

pub mod guard;
pub mod handler;
pub mod identity;
pub mod journal;
pub mod observer;
pub mod state;
pub mod transition;

pub use guard::Guard;
pub use handler::{EventHandler, HandlerRef};
pub use identity::{EqualityPolicy, NaturalEquality};
pub use journal::{Journal, TransitionRecord};
pub use observer::TransitionObserver;
pub use state::{StateBehavior, StateRef};
pub use transition::Transition;
