//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including transitions, head movements, halting classifications, history
//! snapshots and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// A single tape cell value.
pub type Symbol = char;

/// The default blank symbol used on the Turing Machine tape.
pub const DEFAULT_BLANK_SYMBOL: Symbol = '_';
/// Number of blank cells placed on each side of freshly loaded tape content.
/// The head starts on the first cell after the left padding.
pub const TAPE_PADDING: usize = 10;
/// The maximum number of steps to execute before a machine is halted with a timeout.
pub const MAX_EXECUTION_STEPS: usize = 10000;
/// Default number of cells returned by a tape window.
pub const DEFAULT_WINDOW_SIZE: usize = 20;
/// The maximum allowed size for a machine definition file in bytes.
pub const MAX_DEFINITION_SIZE: usize = 65536; // 64KB

/// How strictly a definition file is interpreted.
///
/// - `Normal` (default): malformed transition lines without a single `->` split into
///   2 + 3 fields are skipped, and a repeated `(state, symbol)` key overwrites the earlier rule.
/// - `Strict`: every transition line must be well formed and duplicate keys are errors.
///   Used when constructing the built-in presets.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    /// Lenient, skip what cannot be read as a rule.
    #[default]
    Normal,
    /// Every line in `[TRANSITIONS]` must be a unique, well-formed rule.
    Strict,
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// The single-letter token used in definition files.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

impl FromStr for Direction {
    type Err = TuringMachineError;

    /// Parses `L`, `R` or `S`, ignoring case.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_ascii_uppercase().as_str() {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "S" => Ok(Direction::Stay),
            _ => Err(TuringMachineError::InvalidMove {
                token: token.to_string(),
                line: None,
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single deterministic rule: `(state, read) -> (write, direction, next_state)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// The state this rule fires in.
    pub state: String,
    /// The symbol that must be under the head.
    pub read: Symbol,
    /// The symbol written before moving.
    pub write: Symbol,
    /// Where the head moves after writing.
    pub direction: Direction,
    /// The state the machine enters.
    pub next_state: String,
}

impl Transition {
    pub fn new(
        state: impl Into<String>,
        read: Symbol,
        write: Symbol,
        direction: Direction,
        next_state: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            read,
            write,
            direction,
            next_state: next_state.into(),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "δ({}, {}) = ({}, {}, {})",
            self.state, self.read, self.next_state, self.write, self.direction
        )
    }
}

/// How a halted machine finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Halted in (or moved into) an accept state.
    Accepted,
    /// Halted in (or moved into) a reject state.
    Rejected,
    /// The step ceiling was reached.
    Timeout,
    /// No rule applied in a state that is neither accepting nor rejecting.
    Halted,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
            Outcome::Timeout => "timeout",
            Outcome::Halted => "halted",
        };
        f.write_str(text)
    }
}

/// Run state of a machine. `Halted` is terminal until the machine is reset or rewound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Running,
    Halted(Outcome),
}

impl Status {
    pub fn is_halted(self) -> bool {
        matches!(self, Status::Halted(_))
    }

    /// The final classification, if the machine has halted.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Status::Running => None,
            Status::Halted(outcome) => Some(outcome),
        }
    }
}

/// The machine configuration captured right before a step was attempted.
///
/// `tape` is an independent copy of the whole storage, so later writes never alter it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub step: usize,
    pub state: String,
    pub tape: Vec<Symbol>,
    pub head: usize,
    pub symbol: Symbol,
}

/// Represents various errors that can occur while building or loading a Turing Machine.
///
/// Running a machine never fails: a missing rule and the step ceiling are halting
/// classifications, not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A move token other than `L`, `R` or `S`.
    #[error("{}Invalid move '{token}': use 'L' (left), 'R' (right) or 'S' (stay)", line_prefix(.line))]
    InvalidMove { token: String, line: Option<usize> },
    /// A mandatory `[CONFIG]` key is absent.
    #[error("Missing {0} in [CONFIG]")]
    MissingConfig(String),
    /// The definition contains no usable transition.
    #[error("No transitions defined in [TRANSITIONS]")]
    NoTransitions,
    /// A transition line that cannot be split into a rule.
    #[error("Line {line}: malformed transition '{text}'")]
    MalformedTransitionLine { line: usize, text: String },
    /// A symbol field holding more than one character.
    #[error("{}Invalid symbol '{symbol}': symbols are single characters", line_prefix(.line))]
    InvalidSymbol { symbol: String, line: Option<usize> },
    /// A recognised configuration key with an unusable value.
    #[error("Invalid value '{value}' for {key} in [CONFIG]")]
    InvalidConfig { key: String, value: String },
    /// A second rule for an existing `(state, symbol)` key where overwriting is not allowed.
    #[error("{}Duplicate transition for state {state} and symbol '{symbol}'", line_prefix(.line))]
    DuplicateTransition {
        state: String,
        symbol: Symbol,
        line: Option<usize>,
    },
    /// Indicates an error during the tokenisation of a definition line.
    #[error("Definition parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an error related to file system operations, such as reading definition files.
    #[error("File error: {0}")]
    FileError(String),
    /// No preset is registered under the given key.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

fn line_prefix(line: &Option<usize>) -> String {
    line.map(|n| format!("Line {n}: ")).unwrap_or_default()
}
