//! Injected identifier equality: custom policies at construction and the
//! rules for swapping a policy after states and transitions exist.

use cogwheel::{
    EqualityPolicy, Guard, MachineError, NaturalEquality, StateBehavior, StateMachine, Transition,
};
use std::rc::Rc;

struct CaseInsensitive;

impl EqualityPolicy<String> for CaseInsensitive {
    fn equivalent(&self, a: &String, b: &String) -> bool {
        a.eq_ignore_ascii_case(b)
    }
}

struct ModuloTen;

impl EqualityPolicy<u32> for ModuloTen {
    fn equivalent(&self, a: &u32, b: &u32) -> bool {
        a % 10 == b % 10
    }
}

struct Inert;

impl StateBehavior<String, u32> for Inert {}

struct InertNum;

impl StateBehavior<u32, u32> for InertNum {}

fn s(text: &str) -> String {
    text.to_string()
}

#[test]
fn custom_policy_applies_to_every_lookup() {
    let mut machine: StateMachine<String, u32> =
        StateMachine::with_equality(Rc::new(CaseInsensitive), Rc::new(NaturalEquality));
    machine.add_state(s("Closed"), Inert).unwrap();
    machine.add_state(s("Open"), Inert).unwrap();
    machine
        .add_transition(Transition::new(s("CLOSED"), 1, s("OPEN")))
        .unwrap();

    assert!(machine.contains_state(&s("closed")));
    assert!(machine.contains_transition(&Transition::new(s("closed"), 1, s("open"))));
    assert!(matches!(
        machine.add_state(s("CLOSED"), Inert),
        Err(MachineError::DuplicateState { .. })
    ));

    machine.start().unwrap();
    machine.trigger(1).unwrap();
    // the current state carries the transition's spelling of the id
    let current = machine.current_state().unwrap();
    assert!(current.eq_ignore_ascii_case("open"));
}

#[test]
fn swap_is_rejected_while_started() {
    let mut machine: StateMachine<u32, u32> = StateMachine::new();
    machine.add_state(1, InertNum).unwrap();
    machine.start().unwrap();
    assert!(matches!(
        machine.set_state_equality(Rc::new(ModuloTen)),
        Err(MachineError::AlreadyStarted)
    ));
    machine.stop().unwrap();
    machine.set_state_equality(Rc::new(ModuloTen)).unwrap();
}

#[test]
fn swap_that_merges_state_ids_is_rejected() {
    let mut machine: StateMachine<u32, u32> = StateMachine::new();
    machine.add_state(1, InertNum).unwrap();
    machine.add_state(11, InertNum).unwrap();
    assert!(matches!(
        machine.set_state_equality(Rc::new(ModuloTen)),
        Err(MachineError::DuplicateState { .. })
    ));
    // the failed swap left the original policy in place
    assert!(machine.contains_state(&11));
    assert_eq!(machine.state_count(), 2);
}

#[test]
fn swap_collapses_transitions_and_merges_guards() {
    let mut machine: StateMachine<u32, u32> = StateMachine::new();
    machine.add_state(1, InertNum).unwrap();
    machine.add_state(2, InertNum).unwrap();
    let first = Transition::new(1, 3, 2);
    let second = Transition::new(1, 13, 2);
    machine.add_transition(first.clone()).unwrap();
    machine.add_transition(second.clone()).unwrap();
    let guard_a = Guard::new(|| true);
    let guard_b = Guard::new(|| true);
    machine.add_guard(&first, guard_a.clone()).unwrap();
    machine.add_guard(&second, guard_b.clone()).unwrap();
    assert_eq!(machine.transition_count(), 2);

    machine.set_trigger_equality(Rc::new(ModuloTen)).unwrap();
    assert_eq!(machine.transition_count(), 1);
    let guards = machine.guards_of(&first).unwrap();
    assert_eq!(guards.len(), 2);
    assert!(machine.contains_guard(&first, &guard_a));
    assert!(machine.contains_guard(&first, &guard_b));
}
