//! The machine side: registries owning states, transitions, guards and
//! handlers, plus the execution engine that orchestrates them.

pub mod engine;
pub mod graph;
pub mod guards;
pub mod registry;
pub mod router;

pub use engine::StateMachine;
pub use graph::TransitionGraph;
pub use guards::GuardRegistry;
pub use registry::StateRegistry;
pub use router::EventRouter;
