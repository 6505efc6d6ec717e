//! Error taxonomy for the state machine runtime.
//!
//! Every failure the runtime can report is a variant of [`MachineError`], so
//! callers can match exhaustively instead of chasing a hierarchy of error
//! types. Identifier payloads are carried as `Debug`-formatted strings, which
//! keeps the error type non-generic.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type MachineResult<T> = Result<T, MachineError>;

/// Errors reported by the state machine runtime.
#[derive(Debug, Error)]
pub enum MachineError {
    /// A state with this id is already registered.
    #[error("state id {id} is already registered")]
    DuplicateState { id: String },

    /// The referenced state id is not registered.
    #[error("state id {id} is not registered")]
    StateNotFound { id: String },

    /// The referenced transition is not registered.
    #[error("transition {transition} is not registered")]
    TransitionNotFound { transition: String },

    /// `start` was called on a machine with no states.
    #[error("the machine has no states")]
    EmptyMachine,

    /// The initial state is unset, or no longer resolves to a registered
    /// state.
    #[error("initial state is unset or not registered (was {id:?})")]
    InvalidInitialState { id: Option<String> },

    /// `start` was called while the machine is already started.
    #[error("the machine is already started")]
    AlreadyStarted,

    /// A lifecycle operation requires a started machine.
    #[error("the machine is not started")]
    NotStarted,

    /// More than one guard-valid transition matched the current state and
    /// trigger.
    #[error("multiple valid transitions from state {from} on trigger {trigger}")]
    MultipleValidTransitions { from: String, trigger: String },

    /// The state is the active state or the destination of an in-flight
    /// transition and cannot be removed.
    #[error("state {id} is protected and cannot be removed")]
    ProtectedState { id: String },

    /// Structural mutation attempted while transition candidates are being
    /// evaluated.
    #[error("structural mutation is not allowed while evaluating transitions")]
    EvaluatingTransitions,

    /// The operation is not allowed while a transition sequence is executing.
    #[error("operation is not allowed while a transition is executing")]
    Transitioning,

    /// The operation is not allowed from within the final exit of `stop`.
    #[error("operation is not allowed while the machine is stopping")]
    Stopping,

    /// A host-supplied callback (enter/update/exit handler or observer)
    /// failed.
    #[error("callback failed: {0}")]
    Callback(Box<dyn std::error::Error>),

    /// Several callbacks failed within the same lifecycle phase.
    #[error("{} callbacks failed", .0.len())]
    Aggregate(Vec<MachineError>),
}

impl MachineError {
    /// Wrap a host error (or message) as a callback failure.
    pub fn callback(err: impl Into<Box<dyn std::error::Error>>) -> Self {
        MachineError::Callback(err.into())
    }
}

/// Fold captured callback failures into a single result: zero failures is
/// success, exactly one is re-raised as-is, several are wrapped together.
pub(crate) fn collect_failures(mut failures: Vec<MachineError>) -> MachineResult<()> {
    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        _ => Err(MachineError::Aggregate(failures)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_wraps_messages() {
        let err = MachineError::callback("guard blew up");
        assert!(matches!(err, MachineError::Callback(_)));
        assert_eq!(err.to_string(), "callback failed: guard blew up");
    }

    #[test]
    fn collect_failures_passes_through_single_error() {
        let result = collect_failures(vec![MachineError::AlreadyStarted]);
        assert!(matches!(result, Err(MachineError::AlreadyStarted)));
    }

    #[test]
    fn collect_failures_aggregates_several() {
        let result = collect_failures(vec![
            MachineError::callback("first"),
            MachineError::callback("second"),
        ]);
        match result {
            Err(MachineError::Aggregate(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected aggregate, got {other:?}"),
        }
    }

    #[test]
    fn collect_failures_is_ok_when_empty() {
        assert!(collect_failures(Vec::new()).is_ok());
    }
}
