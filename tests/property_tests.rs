//! Property-based tests for guard semantics and trigger queue ordering.

use cogwheel::{Guard, MachineError, StateBehavior, StateMachine, Transition};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

struct Inert;

impl StateBehavior<u32, u32> for Inert {}

fn chain_machine(length: u32) -> StateMachine<u32, u32> {
    let mut machine = StateMachine::new();
    for id in 0..=length {
        machine.add_state(id, Inert).unwrap();
    }
    for id in 0..length {
        machine.add_transition(Transition::new(id, 0, id + 1)).unwrap();
    }
    machine
}

proptest! {
    #[test]
    fn guard_conjunction_decides_validity(flags in prop::collection::vec(any::<bool>(), 0..6)) {
        let mut machine: StateMachine<u32, u32> = StateMachine::new();
        machine.add_state(1, Inert).unwrap();
        machine.add_state(2, Inert).unwrap();
        let edge = Transition::new(1, 0, 2);
        machine.add_transition(edge.clone()).unwrap();
        for &flag in &flags {
            machine.add_guard(&edge, Guard::new(move || flag)).unwrap();
        }

        machine.start().unwrap();
        machine.trigger(0).unwrap();

        let expected = if flags.iter().all(|&f| f) { 2 } else { 1 };
        prop_assert_eq!(machine.current_state(), Some(&expected));
    }

    #[test]
    fn guard_evaluation_short_circuits(flags in prop::collection::vec(any::<bool>(), 1..6)) {
        let mut machine: StateMachine<u32, u32> = StateMachine::new();
        machine.add_state(1, Inert).unwrap();
        machine.add_state(2, Inert).unwrap();
        let edge = Transition::new(1, 0, 2);
        machine.add_transition(edge.clone()).unwrap();
        let calls = Rc::new(RefCell::new(0usize));
        for &flag in &flags {
            let calls = Rc::clone(&calls);
            machine
                .add_guard(
                    &edge,
                    Guard::new(move || {
                        *calls.borrow_mut() += 1;
                        flag
                    }),
                )
                .unwrap();
        }

        machine.start().unwrap();
        machine.trigger(0).unwrap();

        let expected_calls = match flags.iter().position(|&f| !f) {
            Some(first_false) => first_false + 1,
            None => flags.len(),
        };
        prop_assert_eq!(*calls.borrow(), expected_calls);
    }

    #[test]
    fn trigger_chain_reaches_the_tail(length in 1u32..8) {
        let mut machine = chain_machine(length);
        machine.start().unwrap();
        for _ in 0..length {
            machine.trigger(0).unwrap();
        }
        prop_assert_eq!(machine.current_state(), Some(&length));

        let path: Vec<u32> = (0..=length).collect();
        prop_assert_eq!(machine.journal().path(), path);
    }

    #[test]
    fn queued_chain_matches_external_chain(length in 1u32..8) {
        // queueing every trigger from inside the first enter must visit the
        // same states as triggering externally
        struct Burst(u32);

        impl StateBehavior<u32, u32> for Burst {
            fn on_enter(
                &mut self,
                machine: &mut StateMachine<u32, u32>,
            ) -> cogwheel::MachineResult<()> {
                for _ in 0..self.0 {
                    machine.trigger(0)?;
                }
                Ok(())
            }
        }

        let mut machine: StateMachine<u32, u32> = StateMachine::new();
        machine.add_state(0, Burst(length)).unwrap();
        for id in 1..=length {
            machine.add_state(id, Inert).unwrap();
        }
        for id in 0..length {
            machine.add_transition(Transition::new(id, 0, id + 1)).unwrap();
        }

        machine.start().unwrap();
        prop_assert_eq!(machine.current_state(), Some(&length));
        prop_assert_eq!(machine.journal().len(), length as usize);
    }

    #[test]
    fn simultaneous_winners_always_fail(winners in 2u32..5) {
        let mut machine: StateMachine<u32, u32> = StateMachine::new();
        machine.add_state(0, Inert).unwrap();
        for id in 1..=winners {
            machine.add_state(id, Inert).unwrap();
            machine.add_transition(Transition::new(0, 7, id)).unwrap();
        }

        machine.start().unwrap();
        let result = machine.trigger(7);
        let is_conflict = matches!(
            result,
            Err(MachineError::MultipleValidTransitions { .. })
        );
        prop_assert!(is_conflict);
        prop_assert_eq!(machine.current_state(), Some(&0));
    }
}
