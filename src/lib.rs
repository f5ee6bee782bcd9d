//! This crate provides the core logic for a single-tape Turing Machine simulator.
//! It includes modules for the tape, the transition table, the execution engine, parsing and
//! validating machine definition files, and a catalog of predefined machines.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod transition;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the pre-flight validation pass.
pub use analyzer::{validate, ValidationIssue};
/// Re-exports the `DefinitionLoader` struct from the loader module.
pub use loader::DefinitionLoader;
/// Re-exports the `TuringMachine` struct and its run report from the machine module.
pub use machine::{Report, TuringMachine};
/// Re-exports the parsing entry points from the parser module.
pub use parser::{parse, parse_definition, Definition};
/// Re-exports the preset catalog.
pub use programs::{Catalog, Preset, PRESETS};
/// Re-exports the `Tape` and its inspection window.
pub use tape::{Tape, Window};
/// Re-exports the `TransitionTable`.
pub use transition::TransitionTable;
/// Re-exports the core types.
pub use types::{
    Direction, Mode, Outcome, Snapshot, Status, Symbol, Transition, TuringMachineError,
    DEFAULT_BLANK_SYMBOL, MAX_EXECUTION_STEPS,
};
