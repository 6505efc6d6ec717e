//! The execution engine and public machine facade.

use crate::core::{
    EqualityPolicy, Guard, HandlerRef, Journal, NaturalEquality, StateBehavior, StateRef,
    Transition, TransitionObserver, TransitionRecord,
};
use crate::error::{collect_failures, MachineError, MachineResult};
use crate::machine::graph::TransitionGraph;
use crate::machine::guards::GuardRegistry;
use crate::machine::registry::StateRegistry;
use crate::machine::router::EventRouter;
use chrono::Utc;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::rc::Rc;

/// Nested execution phase tracked while the machine is started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// No engine work in flight.
    Idle,
    /// Inside the initial enter of `start`.
    Starting,
    /// Resolving transition candidates and evaluating guards.
    Evaluating,
    /// Inside the exit/notify/enter sequence of a confirmed transition.
    Transitioning,
    /// Inside the active state's `on_update`.
    Updating,
    /// Inside the final exit of `stop`.
    Stopping,
}

/// An embeddable finite-state-machine runtime.
///
/// Hosts register behaviour objects under opaque state ids (`I`), connect
/// them with [`Transition`] edges fired by triggers (`T`) and gated by
/// [`Guard`]s, and drive the machine with [`start`](Self::start),
/// [`stop`](Self::stop), [`update`](Self::update),
/// [`trigger`](Self::trigger) and [`send_event`](Self::send_event).
///
/// The engine is single-threaded and cooperative: all calls are synchronous,
/// and "re-entrancy" means a state's own callback calling back into the
/// machine. Re-entrant triggers are queued FIFO and drained in a loop, so a
/// chain of immediate transitions never deepens the call stack.
///
/// # Example
///
/// ```rust
/// use cogwheel::{Guard, StateBehavior, StateMachine, Transition};
///
/// struct Door;
/// impl StateBehavior<&'static str, u32> for Door {}
///
/// # fn main() -> cogwheel::MachineResult<()> {
/// let mut machine: StateMachine<&'static str, u32> = StateMachine::new();
/// machine.add_state("closed", Door)?;
/// machine.add_state("open", Door)?;
/// machine.add_transition(Transition::new("closed", 1, "open"))?;
/// machine.add_guard(&Transition::new("closed", 1, "open"), Guard::new(|| true))?;
///
/// machine.start()?;
/// machine.trigger(1)?;
/// assert_eq!(machine.current_state(), Some(&"open"));
/// machine.stop()?;
/// # Ok(())
/// # }
/// ```
pub struct StateMachine<I, T, E = ()> {
    state_eq: Rc<dyn EqualityPolicy<I>>,
    trigger_eq: Rc<dyn EqualityPolicy<T>>,
    registry: StateRegistry<I, T, E>,
    graph: TransitionGraph<I, T>,
    guards: GuardRegistry<I, T>,
    router: EventRouter<I, E>,
    before_observers: Vec<TransitionObserver<I, T>>,
    changed_observers: Vec<TransitionObserver<I, T>>,
    journal: Journal<I, T>,
    current: Option<I>,
    started: bool,
    phase: Phase,
    protected: Option<I>,
    queue: VecDeque<T>,
    draining: bool,
    stop_requested: bool,
}

impl<I, T, E> Default for StateMachine<I, T, E>
where
    I: Clone + Debug + PartialEq + 'static,
    T: Clone + Debug + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T, E> StateMachine<I, T, E>
where
    I: Clone + Debug + PartialEq + 'static,
    T: Clone + Debug + PartialEq + 'static,
{
    /// Machine using the identifier types' own equality.
    pub fn new() -> Self {
        Self::with_equality(Rc::new(NaturalEquality), Rc::new(NaturalEquality))
    }
}

impl<I, T, E> StateMachine<I, T, E>
where
    I: Clone + Debug + 'static,
    T: Clone + Debug + 'static,
{
    /// Machine with injected identifier equality policies.
    pub fn with_equality(
        state_eq: Rc<dyn EqualityPolicy<I>>,
        trigger_eq: Rc<dyn EqualityPolicy<T>>,
    ) -> Self {
        Self {
            state_eq,
            trigger_eq,
            registry: StateRegistry::new(),
            graph: TransitionGraph::new(),
            guards: GuardRegistry::new(),
            router: EventRouter::new(),
            before_observers: Vec::new(),
            changed_observers: Vec::new(),
            journal: Journal::new(),
            current: None,
            started: false,
            phase: Phase::Idle,
            protected: None,
            queue: VecDeque::new(),
            draining: false,
            stop_requested: false,
        }
    }

    // ---- structural mutators -------------------------------------------

    /// Register a state under `id`.
    pub fn add_state<S>(&mut self, id: I, state: S) -> MachineResult<()>
    where
        S: StateBehavior<I, T, E> + 'static,
    {
        self.add_shared_state(id, Rc::new(RefCell::new(state)))
    }

    /// Register a state the host keeps a handle to.
    pub fn add_shared_state(&mut self, id: I, state: StateRef<I, T, E>) -> MachineResult<()> {
        self.registry.add(id, state, &*self.state_eq)
    }

    /// Remove a state and cascade: every transition touching it, those
    /// transitions' guards, and its event handlers. Returns false when the
    /// id was not registered.
    ///
    /// The active state and the destination of an in-flight transition are
    /// protected and cannot be removed.
    pub fn remove_state(&mut self, id: &I) -> MachineResult<bool> {
        if self.phase == Phase::Evaluating {
            return Err(MachineError::EvaluatingTransitions);
        }
        if !self.registry.contains(id, &*self.state_eq) {
            return Ok(false);
        }
        if self.started {
            if let Some(current) = &self.current {
                if self.state_eq.equivalent(current, id) {
                    return Err(MachineError::ProtectedState {
                        id: format!("{id:?}"),
                    });
                }
            }
        }
        if let Some(protected) = &self.protected {
            if self.state_eq.equivalent(protected, id) {
                return Err(MachineError::ProtectedState {
                    id: format!("{id:?}"),
                });
            }
        }
        let removed = self.registry.remove(id, &*self.state_eq);
        for transition in self.graph.remove_related(id, &*self.state_eq) {
            self.guards
                .drop_for(&transition, &*self.state_eq, &*self.trigger_eq);
        }
        self.router.drop_for(id, &*self.state_eq);
        Ok(removed)
    }

    /// Register a transition edge. Both endpoints must be registered states;
    /// duplicate adds are idempotent.
    pub fn add_transition(&mut self, transition: Transition<I, T>) -> MachineResult<()> {
        if self.phase == Phase::Evaluating {
            return Err(MachineError::EvaluatingTransitions);
        }
        for endpoint in [&transition.from, &transition.to] {
            if !self.registry.contains(endpoint, &*self.state_eq) {
                return Err(MachineError::StateNotFound {
                    id: format!("{endpoint:?}"),
                });
            }
        }
        self.graph
            .add(transition, &*self.state_eq, &*self.trigger_eq);
        Ok(())
    }

    /// Remove a transition and its guards; returns whether it was present.
    pub fn remove_transition(&mut self, transition: &Transition<I, T>) -> MachineResult<bool> {
        if self.phase == Phase::Evaluating {
            return Err(MachineError::EvaluatingTransitions);
        }
        let removed = self
            .graph
            .remove(transition, &*self.state_eq, &*self.trigger_eq);
        if removed {
            self.guards
                .drop_for(transition, &*self.state_eq, &*self.trigger_eq);
        }
        Ok(removed)
    }

    /// Attach a guard to a registered transition. Attaching the same guard
    /// handle twice is a no-op.
    pub fn add_guard(&mut self, transition: &Transition<I, T>, guard: Guard<I, T>) -> MachineResult<()> {
        if self.phase == Phase::Evaluating {
            return Err(MachineError::EvaluatingTransitions);
        }
        if !self
            .graph
            .contains(transition, &*self.state_eq, &*self.trigger_eq)
        {
            return Err(MachineError::TransitionNotFound {
                transition: format!("{transition:?}"),
            });
        }
        self.guards
            .add(transition, guard, &*self.state_eq, &*self.trigger_eq);
        Ok(())
    }

    /// Detach a guard; returns whether it was attached.
    pub fn remove_guard(&mut self, transition: &Transition<I, T>, guard: &Guard<I, T>) -> MachineResult<bool> {
        if self.phase == Phase::Evaluating {
            return Err(MachineError::EvaluatingTransitions);
        }
        Ok(self
            .guards
            .remove(transition, guard, &*self.state_eq, &*self.trigger_eq))
    }

    /// Subscribe an event handler to a registered state. Duplicate
    /// subscription of the same handle is a no-op.
    pub fn subscribe_handler(&mut self, id: &I, handler: HandlerRef<E>) -> MachineResult<()> {
        if !self.registry.contains(id, &*self.state_eq) {
            return Err(MachineError::StateNotFound {
                id: format!("{id:?}"),
            });
        }
        self.router.subscribe(id, handler, &*self.state_eq);
        Ok(())
    }

    /// Unsubscribe a handler; returns whether it was subscribed.
    pub fn unsubscribe_handler(&mut self, id: &I, handler: &HandlerRef<E>) -> bool {
        self.router.unsubscribe(id, handler, &*self.state_eq)
    }

    /// Override the initial state used by the next `start`.
    pub fn set_initial_state(&mut self, id: I) -> MachineResult<()> {
        if !self.registry.contains(&id, &*self.state_eq) {
            return Err(MachineError::StateNotFound {
                id: format!("{id:?}"),
            });
        }
        self.registry.set_initial(id);
        Ok(())
    }

    /// Subscribe an observer raised before each exit/enter sequence.
    pub fn on_before_state_change(&mut self, observer: TransitionObserver<I, T>) {
        self.before_observers.push(observer);
    }

    /// Subscribe an observer raised after the current-state pointer moves.
    pub fn on_state_changed(&mut self, observer: TransitionObserver<I, T>) {
        self.changed_observers.push(observer);
    }

    /// Remove a before-transition observer; returns whether it was present.
    pub fn remove_before_observer(&mut self, observer: &TransitionObserver<I, T>) -> bool {
        match self.before_observers.iter().position(|o| o == observer) {
            Some(pos) => {
                self.before_observers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove a state-changed observer; returns whether it was present.
    pub fn remove_changed_observer(&mut self, observer: &TransitionObserver<I, T>) -> bool {
        match self.changed_observers.iter().position(|o| o == observer) {
            Some(pos) => {
                self.changed_observers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Swap the state identifier policy. Legal only while not started; fails
    /// with [`MachineError::DuplicateState`] when two registered ids would
    /// become equivalent. Transitions that collapse under the new policy are
    /// merged with set semantics.
    pub fn set_state_equality(&mut self, policy: Rc<dyn EqualityPolicy<I>>) -> MachineResult<()> {
        if self.started {
            return Err(MachineError::AlreadyStarted);
        }
        let ids = self.registry.ids();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                if policy.equivalent(a, b) {
                    return Err(MachineError::DuplicateState {
                        id: format!("{b:?}"),
                    });
                }
            }
        }
        self.state_eq = policy;
        self.collapse_graph();
        Ok(())
    }

    /// Swap the trigger identifier policy. Legal only while not started.
    pub fn set_trigger_equality(&mut self, policy: Rc<dyn EqualityPolicy<T>>) -> MachineResult<()> {
        if self.started {
            return Err(MachineError::AlreadyStarted);
        }
        self.trigger_eq = policy;
        self.collapse_graph();
        Ok(())
    }

    fn collapse_graph(&mut self) {
        let state_eq = Rc::clone(&self.state_eq);
        let trigger_eq = Rc::clone(&self.trigger_eq);
        for (kept, removed) in self.graph.dedup(&*state_eq, &*trigger_eq) {
            self.guards.merge(&removed, &kept, &*state_eq, &*trigger_eq);
        }
    }

    // ---- queries --------------------------------------------------------

    pub fn contains_state(&self, id: &I) -> bool {
        self.registry.contains(id, &*self.state_eq)
    }

    pub fn contains_transition(&self, transition: &Transition<I, T>) -> bool {
        self.graph
            .contains(transition, &*self.state_eq, &*self.trigger_eq)
    }

    pub fn contains_guard(&self, transition: &Transition<I, T>, guard: &Guard<I, T>) -> bool {
        self.guards
            .contains(transition, guard, &*self.state_eq, &*self.trigger_eq)
    }

    /// Handle to a registered state.
    pub fn get_state(&self, id: &I) -> MachineResult<StateRef<I, T, E>> {
        self.registry.get(id, &*self.state_eq)
    }

    /// Registered state ids in insertion order.
    pub fn states(&self) -> Vec<I> {
        self.registry.ids()
    }

    /// Registered transitions in insertion order.
    pub fn transitions(&self) -> Vec<Transition<I, T>> {
        self.graph.all()
    }

    /// Guards attached to a registered transition.
    pub fn guards_of(&self, transition: &Transition<I, T>) -> MachineResult<Vec<Guard<I, T>>> {
        if !self
            .graph
            .contains(transition, &*self.state_eq, &*self.trigger_eq)
        {
            return Err(MachineError::TransitionNotFound {
                transition: format!("{transition:?}"),
            });
        }
        Ok(self
            .guards
            .guards_of(transition, &*self.state_eq, &*self.trigger_eq))
    }

    /// Event handlers subscribed to a registered state.
    pub fn handlers_of(&self, id: &I) -> MachineResult<Vec<HandlerRef<E>>> {
        if !self.registry.contains(id, &*self.state_eq) {
            return Err(MachineError::StateNotFound {
                id: format!("{id:?}"),
            });
        }
        Ok(self.router.handlers_of(id, &*self.state_eq))
    }

    pub fn has_handler(&self, id: &I, handler: &HandlerRef<E>) -> bool {
        self.router.has_handler(id, handler, &*self.state_eq)
    }

    pub fn has_any_handler(&self, id: &I) -> bool {
        self.router.has_any_handler(id, &*self.state_eq)
    }

    pub fn state_count(&self) -> usize {
        self.registry.len()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.len()
    }

    pub fn is_started(&self) -> bool {
        self.started && !self.stop_requested
    }

    /// The active state id, or `None` while not started.
    pub fn current_state(&self) -> Option<&I> {
        if self.is_started() {
            self.current.as_ref()
        } else {
            None
        }
    }

    /// The state `start` will enter, if one is set.
    pub fn initial_state(&self) -> Option<&I> {
        self.registry.initial()
    }

    /// Journal of committed transitions.
    pub fn journal(&self) -> &Journal<I, T> {
        &self.journal
    }

    /// Drop all journal records.
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    // ---- lifecycle ------------------------------------------------------

    /// Start the machine: enter the initial state, then drain any triggers
    /// the enter requested.
    ///
    /// If the enter callback fails the machine reverts to not-started. If it
    /// calls [`stop`](Self::stop), the stop completes before `start` returns
    /// and the machine ends not-started; that is a supported pattern, not an
    /// error. A nested `start` from within the enter fails with
    /// [`MachineError::AlreadyStarted`].
    pub fn start(&mut self) -> MachineResult<()> {
        if self.started {
            return Err(MachineError::AlreadyStarted);
        }
        if self.registry.is_empty() {
            return Err(MachineError::EmptyMachine);
        }
        let initial = match self.registry.initial() {
            Some(id) if self.registry.contains(id, &*self.state_eq) => id.clone(),
            other => {
                let id = other.map(|id| format!("{id:?}"));
                return Err(MachineError::InvalidInitialState { id });
            }
        };

        self.started = true;
        self.current = Some(initial.clone());
        self.phase = Phase::Starting;
        self.draining = true;
        let entered = self.run_enter(&initial);
        self.phase = Phase::Idle;

        if let Err(err) = entered {
            // no partial state: a failed enter leaves the machine not started
            self.started = false;
            self.stop_requested = false;
            self.current = None;
            self.queue.clear();
            self.draining = false;
            return Err(err);
        }

        let result = if self.stop_requested {
            self.stop_requested = false;
            self.queue.clear();
            self.finish_stop()
        } else {
            tracing::debug!(initial = ?initial, "state machine started");
            self.drain_queue()
        };
        self.draining = false;
        result
    }

    /// Stop the machine: run the active state's exit, then clear the current
    /// state. A no-op when not started.
    ///
    /// A failing exit leaves the machine started. Re-entrant `stop` from
    /// that exit fails with [`MachineError::Stopping`]; `stop` from within a
    /// transition sequence fails with [`MachineError::Transitioning`]. From
    /// within the initial enter of `start` or an `update` callback the stop
    /// is honoured once the callback in flight returns.
    pub fn stop(&mut self) -> MachineResult<()> {
        if !self.is_started() {
            return Ok(());
        }
        match self.phase {
            Phase::Stopping => Err(MachineError::Stopping),
            Phase::Transitioning | Phase::Evaluating => Err(MachineError::Transitioning),
            Phase::Starting | Phase::Updating => {
                self.stop_requested = true;
                Ok(())
            }
            Phase::Idle => self.finish_stop(),
        }
    }

    /// Forward to the active state's `on_update`, then drain any triggers it
    /// requested.
    pub fn update(&mut self) -> MachineResult<()> {
        if !self.is_started() {
            return Err(MachineError::NotStarted);
        }
        match self.phase {
            Phase::Idle => {}
            Phase::Stopping => return Err(MachineError::Stopping),
            _ => return Err(MachineError::Transitioning),
        }
        let current = self.current.clone().ok_or(MachineError::NotStarted)?;

        self.phase = Phase::Updating;
        self.draining = true;
        let updated = self.run_update(&current);
        self.phase = Phase::Idle;

        let result = match updated {
            Err(err) => {
                self.queue.clear();
                // an accepted re-entrant stop is still honoured when the
                // callback itself fails
                if self.stop_requested {
                    self.stop_requested = false;
                    let mut failures = vec![err];
                    if let Err(stop_err) = self.finish_stop() {
                        failures.push(stop_err);
                    }
                    collect_failures(failures)
                } else {
                    Err(err)
                }
            }
            Ok(()) => {
                if self.stop_requested {
                    self.stop_requested = false;
                    self.queue.clear();
                    self.finish_stop()
                } else {
                    self.drain_queue()
                }
            }
        };
        self.draining = false;
        result
    }

    /// Request a transition. The trigger is queued; if no drain is already
    /// in progress the queue is drained synchronously before this call
    /// returns. A trigger that matches no guard-valid transition is a no-op;
    /// one that matches several fails with
    /// [`MachineError::MultipleValidTransitions`] and discards the rest of
    /// the queue.
    pub fn trigger(&mut self, trigger: T) -> MachineResult<()> {
        if !self.is_started() {
            return Err(MachineError::NotStarted);
        }
        if self.phase == Phase::Stopping {
            return Err(MachineError::Stopping);
        }
        self.queue.push_back(trigger);
        if self.draining {
            return Ok(());
        }
        self.draining = true;
        let result = self.drain_queue();
        self.draining = false;
        result
    }

    /// Route an event to the active state's handlers, in registration order,
    /// until one consumes it. Returns whether any handler did.
    pub fn send_event(&mut self, event: &E) -> MachineResult<bool> {
        if !self.is_started() {
            return Err(MachineError::NotStarted);
        }
        let Some(current) = self.current.clone() else {
            return Err(MachineError::NotStarted);
        };
        let handlers = self.router.handlers_of(&current, &*self.state_eq);
        for handler in handlers {
            if handler.dispatch(event) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    // ---- engine internals ----------------------------------------------

    fn drain_queue(&mut self) -> MachineResult<()> {
        while let Some(trigger) = self.queue.pop_front() {
            let Some(current) = self.current.clone() else {
                break;
            };
            let resolved = match self.resolve(&current, &trigger) {
                Ok(resolved) => resolved,
                Err(err) => {
                    self.queue.clear();
                    return Err(err);
                }
            };
            match resolved {
                Some(transition) => {
                    if let Err(err) = self.execute(transition) {
                        self.queue.clear();
                        return Err(err);
                    }
                }
                None => {
                    tracing::trace!(state = ?current, trigger = ?trigger, "trigger matched no valid transition");
                }
            }
        }
        Ok(())
    }

    /// Pick the winning transition for `(current, trigger)`: the candidate
    /// whose guards all pass. Zero winners is a no-op; two or more is an
    /// error, never resolved by priority.
    fn resolve(&mut self, current: &I, trigger: &T) -> MachineResult<Option<Transition<I, T>>> {
        self.phase = Phase::Evaluating;
        let candidates =
            self.graph
                .matching_from(current, trigger, &*self.state_eq, &*self.trigger_eq);
        let mut winner: Option<Transition<I, T>> = None;
        for candidate in candidates {
            if !self
                .guards
                .all_valid(&candidate, &*self.state_eq, &*self.trigger_eq)
            {
                continue;
            }
            if winner.is_some() {
                self.phase = Phase::Idle;
                return Err(MachineError::MultipleValidTransitions {
                    from: format!("{current:?}"),
                    trigger: format!("{trigger:?}"),
                });
            }
            winner = Some(candidate);
        }
        self.phase = Phase::Idle;
        Ok(winner)
    }

    /// Run the exit/notify/enter sequence for a resolved transition. The
    /// destination is protected until its enter completes. Callback and
    /// observer failures are captured so every sibling still runs, then
    /// re-raised together once the sequence is done.
    fn execute(&mut self, transition: Transition<I, T>) -> MachineResult<()> {
        self.phase = Phase::Transitioning;
        self.protected = Some(transition.to.clone());
        let mut failures = Vec::new();

        for observer in &self.before_observers {
            if let Err(err) = observer.call(&transition.from, &transition.trigger, &transition.to) {
                failures.push(err);
            }
        }
        if let Err(err) = self.run_exit(&transition.from) {
            failures.push(err);
        }

        self.current = Some(transition.to.clone());
        self.journal.record(TransitionRecord {
            from: transition.from.clone(),
            trigger: transition.trigger.clone(),
            to: transition.to.clone(),
            timestamp: Utc::now(),
        });

        for observer in &self.changed_observers {
            if let Err(err) = observer.call(&transition.from, &transition.trigger, &transition.to) {
                failures.push(err);
            }
        }
        if let Err(err) = self.run_enter(&transition.to) {
            failures.push(err);
        }

        self.protected = None;
        self.phase = Phase::Idle;
        tracing::debug!(
            from = ?transition.from,
            trigger = ?transition.trigger,
            to = ?transition.to,
            "state changed"
        );
        collect_failures(failures)
    }

    fn finish_stop(&mut self) -> MachineResult<()> {
        let Some(current) = self.current.clone() else {
            self.started = false;
            return Ok(());
        };
        self.phase = Phase::Stopping;
        let exited = self.run_exit(&current);
        self.phase = Phase::Idle;
        match exited {
            // stop did not complete; the machine stays started
            Err(err) => Err(err),
            Ok(()) => {
                self.started = false;
                self.current = None;
                self.queue.clear();
                tracing::debug!("state machine stopped");
                Ok(())
            }
        }
    }

    fn run_enter(&mut self, id: &I) -> MachineResult<()> {
        let state = self.registry.get(id, &*self.state_eq)?;
        let mut state = state.borrow_mut();
        state.on_enter(self)
    }

    fn run_update(&mut self, id: &I) -> MachineResult<()> {
        let state = self.registry.get(id, &*self.state_eq)?;
        let mut state = state.borrow_mut();
        state.on_update(self)
    }

    fn run_exit(&mut self, id: &I) -> MachineResult<()> {
        let state = self.registry.get(id, &*self.state_eq)?;
        let mut state = state.borrow_mut();
        state.on_exit(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;

    impl StateBehavior<u32, u32> for Inert {}

    fn machine_with_states(ids: &[u32]) -> StateMachine<u32, u32> {
        let mut machine = StateMachine::new();
        for &id in ids {
            machine.add_state(id, Inert).unwrap();
        }
        machine
    }

    #[test]
    fn start_requires_states() {
        let mut machine: StateMachine<u32, u32> = StateMachine::new();
        assert!(matches!(machine.start(), Err(MachineError::EmptyMachine)));
    }

    #[test]
    fn start_stop_roundtrip() {
        let mut machine = machine_with_states(&[1]);
        machine.start().unwrap();
        assert!(machine.is_started());
        assert_eq!(machine.current_state(), Some(&1));
        machine.stop().unwrap();
        assert!(!machine.is_started());
        assert_eq!(machine.current_state(), None);
    }

    #[test]
    fn stop_is_a_no_op_when_not_started() {
        let mut machine = machine_with_states(&[1]);
        assert!(machine.stop().is_ok());
    }

    #[test]
    fn double_start_fails() {
        let mut machine = machine_with_states(&[1]);
        machine.start().unwrap();
        assert!(matches!(machine.start(), Err(MachineError::AlreadyStarted)));
    }

    #[test]
    fn lifecycle_calls_require_a_started_machine() {
        let mut machine = machine_with_states(&[1]);
        assert!(matches!(machine.trigger(0), Err(MachineError::NotStarted)));
        assert!(matches!(machine.update(), Err(MachineError::NotStarted)));
        assert!(matches!(
            machine.send_event(&()),
            Err(MachineError::NotStarted)
        ));
    }

    #[test]
    fn trigger_without_matching_transition_is_a_no_op() {
        let mut machine = machine_with_states(&[1]);
        machine.start().unwrap();
        machine.trigger(9).unwrap();
        assert_eq!(machine.current_state(), Some(&1));
    }

    #[test]
    fn transition_endpoints_must_exist() {
        let mut machine = machine_with_states(&[1]);
        let err = machine.add_transition(Transition::new(1, 0, 99)).unwrap_err();
        assert!(matches!(err, MachineError::StateNotFound { .. }));
    }

    #[test]
    fn guards_require_a_registered_transition() {
        let mut machine = machine_with_states(&[1, 2]);
        let err = machine
            .add_guard(&Transition::new(1, 0, 2), Guard::new(|| true))
            .unwrap_err();
        assert!(matches!(err, MachineError::TransitionNotFound { .. }));
    }

    #[test]
    fn basic_trigger_moves_the_machine() {
        let mut machine = machine_with_states(&[1, 2]);
        machine.add_transition(Transition::new(1, 0, 2)).unwrap();
        machine.start().unwrap();
        machine.trigger(0).unwrap();
        assert_eq!(machine.current_state(), Some(&2));
        assert_eq!(machine.journal().len(), 1);
        assert_eq!(machine.journal().path(), vec![1, 2]);
    }

    #[test]
    fn initial_state_can_be_overridden() {
        let mut machine = machine_with_states(&[1, 2]);
        machine.set_initial_state(2).unwrap();
        machine.start().unwrap();
        assert_eq!(machine.current_state(), Some(&2));
    }

    #[test]
    fn start_fails_on_dangling_initial_state() {
        let mut machine = machine_with_states(&[1, 2]);
        machine.remove_state(&1).unwrap();
        assert!(matches!(
            machine.start(),
            Err(MachineError::InvalidInitialState { .. })
        ));
    }

    #[test]
    fn equality_swap_is_rejected_while_started() {
        let mut machine = machine_with_states(&[1]);
        machine.start().unwrap();
        let err = machine
            .set_state_equality(Rc::new(NaturalEquality))
            .unwrap_err();
        assert!(matches!(err, MachineError::AlreadyStarted));
    }
}
