//! This module defines the `TuringMachine` struct, which simulates a single-tape deterministic
//! Turing Machine. It owns the tape, the transition table, the halting classification and the
//! per-step history used for inspection, rewind and tape-preserving resets.

use crate::tape::Tape;
use crate::transition::TransitionTable;
use crate::types::{
    Direction, Outcome, Snapshot, Status, Symbol, TuringMachineError, DEFAULT_BLANK_SYMBOL,
    MAX_EXECUTION_STEPS,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Name given to machines that are built without one.
pub const DEFAULT_MACHINE_NAME: &str = "Turing Machine";

/// Represents a single-tape deterministic Turing Machine.
///
/// Lifecycle: construct, [`configure`](Self::configure), add transitions,
/// [`load_tape`](Self::load_tape), then [`step`](Self::step) or [`run`](Self::run).
/// All halting policy lives in `step`.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    name: String,
    description: String,
    table: TransitionTable,
    initial_state: String,
    accept_states: BTreeSet<String>,
    reject_states: BTreeSet<String>,
    blank: Symbol,
    max_steps: usize,
    tape: Option<Tape>,
    state: String,
    step_count: usize,
    status: Status,
    history: Vec<Snapshot>,
}

impl TuringMachine {
    /// Creates an unconfigured machine with an empty transition table and no tape.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            table: TransitionTable::new(),
            initial_state: String::new(),
            accept_states: BTreeSet::new(),
            reject_states: BTreeSet::new(),
            blank: DEFAULT_BLANK_SYMBOL,
            max_steps: MAX_EXECUTION_STEPS,
            tape: None,
            state: String::new(),
            step_count: 0,
            status: Status::Running,
            history: Vec::new(),
        }
    }

    /// Fixes the initial state, the state classification sets and the blank symbol.
    ///
    /// Configuring again is a full reset: run state and history are cleared and any
    /// loaded tape is dropped, since it was padded with the previous blank symbol.
    pub fn configure<A, R>(
        &mut self,
        initial_state: &str,
        accept_states: A,
        reject_states: R,
        blank: Symbol,
    ) where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        self.initial_state = initial_state.to_string();
        self.accept_states = accept_states.into_iter().map(Into::into).collect();
        self.reject_states = reject_states.into_iter().map(Into::into).collect();
        self.blank = blank;
        self.tape = None;
        self.restart();
    }

    /// Places `input` on a freshly padded tape and restarts execution from the initial state.
    pub fn load_tape(&mut self, input: &str) {
        self.tape = Some(Tape::with_content(input, self.blank));
        self.restart();
    }

    /// Adds a rule, replacing any rule already stored for `(state, read)`.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::InvalidMove)` if `direction` is not `L`, `R` or `S`.
    pub fn add_transition(
        &mut self,
        state: &str,
        read: Symbol,
        write: Symbol,
        direction: &str,
        next_state: &str,
    ) -> Result<(), TuringMachineError> {
        self.table.add(state, read, write, direction, next_state)
    }

    /// Replaces the whole transition table.
    pub fn set_transitions(&mut self, table: TransitionTable) {
        self.table = table;
    }

    /// Executes a single step of the machine.
    ///
    /// Returns `true` if the caller may keep stepping, `false` once the machine has
    /// halted. Calling it on a halted machine changes nothing. A machine without a
    /// loaded tape runs on a blank one.
    pub fn step(&mut self) -> bool {
        if self.status.is_halted() {
            return false;
        }

        let blank = self.blank;
        let tape = self.tape.get_or_insert_with(|| Tape::new(blank));
        let symbol = tape.read();

        self.history.push(Snapshot {
            step: self.step_count,
            state: self.state.clone(),
            tape: tape.cells(),
            head: tape.head(),
            symbol,
        });

        let Some(transition) = self.table.lookup(&self.state, symbol) else {
            let outcome = self.classify(&self.state).unwrap_or(Outcome::Halted);
            self.status = Status::Halted(outcome);
            return false;
        };

        tape.write(transition.write);
        match transition.direction {
            Direction::Left => tape.move_left(),
            Direction::Right => tape.move_right(),
            Direction::Stay => {}
        }
        self.state.clone_from(&transition.next_state);
        self.step_count += 1;

        if let Some(outcome) = self.classify(&self.state) {
            self.status = Status::Halted(outcome);
            return false;
        }

        if self.step_count >= self.max_steps {
            self.status = Status::Halted(Outcome::Timeout);
            return false;
        }

        true
    }

    /// Steps until the machine halts and returns how it finished.
    ///
    /// `max_steps` replaces the step ceiling when given and non-zero.
    pub fn run(&mut self, max_steps: Option<usize>) -> Outcome {
        if let Some(max_steps) = max_steps.filter(|&n| n > 0) {
            self.max_steps = max_steps;
        }

        while self.step() {}

        self.status.outcome().unwrap_or(Outcome::Halted)
    }

    /// Restores the initial state and clears the step counter, halt flags and history.
    ///
    /// With `keep_tape_content`, a machine that has already stepped gets back the tape it
    /// had before its first step. In every other case a loaded tape is reset to blank.
    pub fn reset(&mut self, keep_tape_content: bool) {
        match self.history.first().filter(|_| keep_tape_content) {
            Some(first) => {
                self.tape = Some(Tape::restore(first.tape.clone(), first.head, self.blank));
            }
            None => {
                if let Some(tape) = self.tape.as_mut() {
                    tape.reset(None);
                }
            }
        }

        self.restart();
    }

    /// Undoes the most recent step using its history snapshot, clearing any halt
    /// classification. Returns `false` when there is no history to rewind.
    pub fn rewind(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };

        self.state = snapshot.state;
        self.step_count = snapshot.step;
        self.tape = Some(Tape::restore(snapshot.tape, snapshot.head, self.blank));
        self.status = Status::Running;
        true
    }

    /// Returns `Some(Accepted | Rejected)` when `state` is in one of the classification sets.
    fn classify(&self, state: &str) -> Option<Outcome> {
        if self.accept_states.contains(state) {
            Some(Outcome::Accepted)
        } else if self.reject_states.contains(state) {
            Some(Outcome::Rejected)
        } else {
            None
        }
    }

    fn restart(&mut self) {
        self.state = self.initial_state.clone();
        self.step_count = 0;
        self.status = Status::Running;
        self.history.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the initial state of the Turing Machine.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn accept_states(&self) -> &BTreeSet<String> {
        &self.accept_states
    }

    pub fn reject_states(&self) -> &BTreeSet<String> {
        &self.reject_states
    }

    /// Returns the blank symbol used by this Turing Machine.
    pub fn blank(&self) -> Symbol {
        self.blank
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.table
    }

    /// Returns the number of transitions executed since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// The step ceiling after which the machine halts with [`Outcome::Timeout`].
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        self.status.is_halted()
    }

    pub fn is_accepted(&self) -> bool {
        self.status == Status::Halted(Outcome::Accepted)
    }

    pub fn is_rejected(&self) -> bool {
        self.status == Status::Halted(Outcome::Rejected)
    }

    pub fn is_timed_out(&self) -> bool {
        self.status == Status::Halted(Outcome::Timeout)
    }

    /// The loaded tape, if any.
    pub fn tape(&self) -> Option<&Tape> {
        self.tape.as_ref()
    }

    /// Head position on the loaded tape, `0` when no tape is loaded.
    pub fn head(&self) -> usize {
        self.tape.as_ref().map_or(0, Tape::head)
    }

    /// The symbol under the head, if a tape is loaded.
    pub fn current_symbol(&self) -> Option<Symbol> {
        self.tape.as_ref().map(Tape::read)
    }

    /// One snapshot per attempted step, oldest first.
    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// A short human-readable description of the run state.
    pub fn result_string(&self) -> &'static str {
        match self.status {
            Status::Running => "running",
            Status::Halted(Outcome::Accepted) => "ACCEPTED",
            Status::Halted(Outcome::Rejected) => "REJECTED",
            Status::Halted(Outcome::Timeout) => "TIMEOUT (step ceiling reached)",
            Status::Halted(Outcome::Halted) => "HALTED",
        }
    }

    /// Captures the current run state in a serializable form.
    pub fn report(&self) -> Report {
        Report {
            name: self.name.clone(),
            state: self.state.clone(),
            steps: self.step_count,
            outcome: self.status.outcome(),
            tape: self.tape.as_ref().map(Tape::content).unwrap_or_default(),
            head: self.head(),
            history_len: self.history.len(),
        }
    }
}

impl Default for TuringMachine {
    fn default() -> Self {
        Self::new(DEFAULT_MACHINE_NAME, "")
    }
}

impl fmt::Display for TuringMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TuringMachine(name='{}', state={}, steps={})",
            self.name, self.state, self.step_count
        )
    }
}

/// A serializable summary of a machine's run state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub name: String,
    pub state: String,
    pub steps: usize,
    /// `None` while the machine is still running.
    pub outcome: Option<Outcome>,
    /// Tape content without the blank padding.
    pub tape: String,
    pub head: usize,
    pub history_len: usize,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
