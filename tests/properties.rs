//! Property-based tests for the tape and the execution engine.
//!
//! These tests use proptest to check the halting, history and tape invariants
//! across randomly generated machines and inputs.

use proptest::prelude::*;
use tmsim::{Catalog, Direction, Outcome, Status, Tape, Transition, TransitionTable, TuringMachine};

const BLANK: char = '_';
const STATES: [&str; 4] = ["q0", "q1", "q2", "q3"];
const SYMBOLS: [char; 3] = ['0', '1', BLANK];

fn arbitrary_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Right),
        Just(Direction::Stay),
    ]
}

prop_compose! {
    fn arbitrary_transition()(
        state in 0..STATES.len(),
        read in 0..SYMBOLS.len(),
        write in 0..SYMBOLS.len(),
        direction in arbitrary_direction(),
        next in 0..STATES.len(),
    ) -> Transition {
        Transition::new(STATES[state], SYMBOLS[read], SYMBOLS[write], direction, STATES[next])
    }
}

prop_compose! {
    /// A random machine over four states, with q2 accepting and q3 rejecting.
    fn arbitrary_machine()(
        transitions in prop::collection::vec(arbitrary_transition(), 0..16),
        max_steps in 1usize..200,
    ) -> TuringMachine {
        let mut machine = TuringMachine::default();
        machine.configure("q0", ["q2"], ["q3"], BLANK);
        machine.set_transitions(transitions.into_iter().collect::<TransitionTable>());
        machine.set_max_steps(max_steps);
        machine
    }
}

fn arbitrary_input() -> impl Strategy<Value = String> {
    "[01]{0,12}"
}

proptest! {
    #[test]
    fn step_after_halt_changes_nothing(mut machine in arbitrary_machine(), input in arbitrary_input()) {
        machine.load_tape(&input);
        machine.run(None);
        prop_assert!(machine.is_halted());

        let tape = machine.tape().cloned();
        let state = machine.state().to_string();
        let steps = machine.step_count();
        let history = machine.history().len();
        let status = machine.status();

        prop_assert!(!machine.step());
        prop_assert_eq!(machine.tape().cloned(), tape);
        prop_assert_eq!(machine.state(), state.as_str());
        prop_assert_eq!(machine.step_count(), steps);
        prop_assert_eq!(machine.history().len(), history);
        prop_assert_eq!(machine.status(), status);
    }

    #[test]
    fn step_counter_and_history_track_each_step(mut machine in arbitrary_machine(), input in arbitrary_input()) {
        machine.load_tape(&input);

        loop {
            prop_assert_eq!(machine.history().len(), machine.step_count());

            let before = machine.step_count();
            let rule_exists = machine
                .transitions()
                .contains(machine.state(), machine.current_symbol().unwrap());
            let continues = machine.step();

            if rule_exists {
                prop_assert_eq!(machine.step_count(), before + 1);
            } else {
                prop_assert_eq!(machine.step_count(), before);
                prop_assert!(!continues);
            }

            if !continues {
                break;
            }
        }

        prop_assert!(machine.is_halted());
    }

    #[test]
    fn missing_rule_halts_by_state_membership(mut machine in arbitrary_machine(), input in arbitrary_input()) {
        machine.load_tape(&input);

        while !machine.is_halted() {
            let state = machine.state().to_string();
            let symbol = machine.current_symbol().unwrap();

            if machine.transitions().lookup(&state, symbol).is_none() {
                machine.step();
                let expected = match state.as_str() {
                    "q2" => Outcome::Accepted,
                    "q3" => Outcome::Rejected,
                    _ => Outcome::Halted,
                };
                prop_assert_eq!(machine.status(), Status::Halted(expected));
                break;
            }

            machine.step();
        }
    }

    #[test]
    fn run_never_exceeds_the_step_ceiling(mut machine in arbitrary_machine(), input in arbitrary_input()) {
        machine.load_tape(&input);
        let outcome = machine.run(None);

        prop_assert!(machine.step_count() <= machine.max_steps());
        if outcome == Outcome::Timeout {
            prop_assert_eq!(machine.step_count(), machine.max_steps());
        }
    }

    #[test]
    fn reset_clears_history_and_restores_input(mut machine in arbitrary_machine(), input in arbitrary_input()) {
        machine.load_tape(&input);
        let initial = machine.tape().cloned();
        machine.run(None);

        machine.reset(true);
        prop_assert!(machine.history().is_empty());
        prop_assert_eq!(machine.step_count(), 0);
        prop_assert_eq!(machine.state(), "q0");
        prop_assert_eq!(machine.tape().cloned(), initial);
    }

    #[test]
    fn tape_write_read_round_trip(moves in prop::collection::vec(any::<bool>(), 0..64), symbol in any::<char>()) {
        let mut tape = Tape::with_content("01", BLANK);
        for left in moves {
            if left {
                tape.move_left();
            } else {
                tape.move_right();
            }
            prop_assert!(tape.head() < tape.len());
        }

        tape.write(symbol);
        prop_assert_eq!(tape.read(), symbol);
    }

    #[test]
    fn moving_left_from_start_reads_blank(count in 1usize..100) {
        let mut tape = Tape::new(BLANK);
        for _ in 0..count {
            tape.move_left();
            prop_assert_eq!(tape.read(), BLANK);
        }
    }

    #[test]
    fn binary_increment_adds_one(value in 0u32..4096) {
        let mut machine = Catalog::get("binary_increment").unwrap().build().unwrap();
        machine.load_tape(&format!("{value:b}"));

        prop_assert_eq!(machine.run(None), Outcome::Accepted);
        prop_assert_eq!(machine.tape().unwrap().content(), format!("{:b}", value + 1));
    }
}
