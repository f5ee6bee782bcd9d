//! This module provides the parser for machine definition files, utilizing the `pest` crate.
//!
//! A definition is a line-oriented text with bracketed section headers:
//!
//! ```text
//! [METADATA]
//! name: Binary increment
//!
//! [CONFIG]
//! initial_state: q0
//! accept_states: qf
//! blank_symbol: _
//!
//! [TRANSITIONS]
//! q0, 1 -> 1, R, q0
//! q0, _ -> _, L, q1
//!
//! [INPUT]
//! 1011
//! ```
//!
//! Lines are trimmed; blank lines and `#` comments are ignored, as are lines before the first
//! header. Parsing is all-or-nothing: on error no machine is returned.

use crate::machine::TuringMachine;
use crate::transition::TransitionTable;
use crate::types::{
    Direction, Mode, Symbol, Transition, TuringMachineError, DEFAULT_BLANK_SYMBOL,
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;
use std::collections::BTreeMap;
use tracing::debug;

/// Name used when `[METADATA]` does not provide one.
pub const DEFAULT_DEFINITION_NAME: &str = "Custom Machine";

/// Derives a `PestParser` for the definition line grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Everything read from a definition file.
#[derive(Debug, Clone)]
pub struct Definition {
    /// The configured machine, with no tape loaded.
    pub machine: TuringMachine,
    /// Concatenated `[INPUT]` lines.
    pub input: String,
    /// Free-form `[METADATA]` entries, including `name` and `description` when present.
    pub metadata: BTreeMap<String, String>,
    /// `[ALPHABET]` symbol lists. Informational only, never checked against the rules.
    pub alphabet: BTreeMap<String, Vec<String>>,
    /// Scalar `[CONFIG]` entries as written (`accept_states`/`reject_states` excluded).
    pub config: BTreeMap<String, String>,
}

/// Parses a definition into a configured machine and its default input string.
///
/// This is the main entry point and uses [`Mode::Normal`].
///
/// # Returns
///
/// * `Ok((machine, input))` on success; the machine has no tape loaded.
/// * `Err(TuringMachineError::InvalidMove)` if a rule uses a move other than L/R/S.
/// * `Err(TuringMachineError::MissingConfig)` if `initial_state` is never set.
/// * `Err(TuringMachineError::NoTransitions)` if no rule could be read.
pub fn parse(source: &str) -> Result<(TuringMachine, String), TuringMachineError> {
    parse_definition(source, Mode::Normal).map(|definition| (definition.machine, definition.input))
}

/// Parses a definition, keeping the informational sections.
pub fn parse_definition(source: &str, mode: Mode) -> Result<Definition, TuringMachineError> {
    let mut sections = Sections::new(mode);

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(section) = parse_header(line) {
            sections.current = Some(section);
            continue;
        }

        sections.process_line(index + 1, line)?;
    }

    sections.into_definition()
}

/// The section a content line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Metadata,
    Config,
    Alphabet,
    Transitions,
    Input,
    Unknown,
}

impl Section {
    fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "metadata" => Section::Metadata,
            "config" => Section::Config,
            "alphabet" => Section::Alphabet,
            "transitions" => Section::Transitions,
            "input" => Section::Input,
            _ => Section::Unknown,
        }
    }
}

/// A rule as written, before the blank symbol is known.
struct ParsedTransition {
    line: usize,
    state: String,
    read: Option<Symbol>,
    write: Option<Symbol>,
    direction: Direction,
    next_state: String,
}

/// Accumulates section contents while scanning lines.
struct Sections {
    mode: Mode,
    current: Option<Section>,
    metadata: BTreeMap<String, String>,
    config: BTreeMap<String, String>,
    accept_states: Vec<String>,
    reject_states: Vec<String>,
    blank: Option<Symbol>,
    max_steps: Option<usize>,
    alphabet: BTreeMap<String, Vec<String>>,
    transitions: Vec<ParsedTransition>,
    input: String,
}

impl Sections {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            current: None,
            metadata: BTreeMap::new(),
            config: BTreeMap::new(),
            accept_states: Vec::new(),
            reject_states: Vec::new(),
            blank: None,
            max_steps: None,
            alphabet: BTreeMap::new(),
            transitions: Vec::new(),
            input: String::new(),
        }
    }

    fn process_line(&mut self, line_no: usize, line: &str) -> Result<(), TuringMachineError> {
        match self.current {
            Some(Section::Metadata) => {
                if let Some((key, value)) = parse_entry(line) {
                    self.metadata.insert(key.to_string(), value.to_string());
                }
            }
            Some(Section::Config) => {
                if let Some((key, value)) = parse_entry(line) {
                    self.process_config(line_no, key, value)?;
                }
            }
            Some(Section::Alphabet) => {
                if let Some((key, value)) = parse_entry(line) {
                    self.alphabet.insert(key.to_string(), split_list(value));
                }
            }
            Some(Section::Transitions) => {
                if let Some(transition) = self.parse_transition(line_no, line)? {
                    self.transitions.push(transition);
                }
            }
            Some(Section::Input) => self.input.push_str(line),
            Some(Section::Unknown) | None => {}
        }

        Ok(())
    }

    fn process_config(
        &mut self,
        line_no: usize,
        key: &str,
        value: &str,
    ) -> Result<(), TuringMachineError> {
        match key {
            "accept_states" => self.accept_states = split_list(value),
            "reject_states" => self.reject_states = split_list(value),
            _ => {
                match key {
                    "blank_symbol" => self.blank = parse_symbol(value, line_no)?,
                    "max_steps" => {
                        let max_steps = value
                            .parse::<usize>()
                            .ok()
                            .filter(|&n| n > 0)
                            .ok_or_else(|| TuringMachineError::InvalidConfig {
                                key: key.to_string(),
                                value: value.to_string(),
                            })?;
                        self.max_steps = Some(max_steps);
                    }
                    _ => {}
                }
                self.config.insert(key.to_string(), value.to_string());
            }
        }

        Ok(())
    }

    /// Reads one `[TRANSITIONS]` line.
    ///
    /// Lines without `->`, or whose sides do not split into 2 and 3 fields, are skipped in
    /// `Normal` mode and rejected in `Strict` mode. More than one `->` is always an error.
    fn parse_transition(
        &self,
        line_no: usize,
        line: &str,
    ) -> Result<Option<ParsedTransition>, TuringMachineError> {
        let sides = split_transition(line)?;
        let malformed = || TuringMachineError::MalformedTransitionLine {
            line: line_no,
            text: line.to_string(),
        };

        let (lhs, rhs) = match sides.as_slice() {
            [lhs, rhs] if lhs.len() == 2 && rhs.len() == 3 => (lhs, rhs),
            [_] | [_, _] => {
                if self.mode == Mode::Strict {
                    return Err(malformed());
                }
                debug!(line = line_no, text = line, "skipping transition line without a rule shape");
                return Ok(None);
            }
            _ => return Err(malformed()),
        };

        let direction =
            rhs[1]
                .parse::<Direction>()
                .map_err(|_| TuringMachineError::InvalidMove {
                    token: rhs[1].to_string(),
                    line: Some(line_no),
                })?;

        Ok(Some(ParsedTransition {
            line: line_no,
            state: lhs[0].to_string(),
            read: parse_symbol(lhs[1], line_no)?,
            write: parse_symbol(rhs[0], line_no)?,
            direction,
            next_state: rhs[2].to_string(),
        }))
    }

    fn into_definition(self) -> Result<Definition, TuringMachineError> {
        let initial_state = self
            .config
            .get("initial_state")
            .filter(|state| !state.is_empty())
            .cloned()
            .ok_or_else(|| TuringMachineError::MissingConfig("initial_state".to_string()))?;

        if self.transitions.is_empty() {
            return Err(TuringMachineError::NoTransitions);
        }

        let blank = self.blank.unwrap_or(DEFAULT_BLANK_SYMBOL);
        let mut table = TransitionTable::new();
        for parsed in self.transitions {
            let line = parsed.line;
            let transition = Transition::new(
                parsed.state,
                parsed.read.unwrap_or(blank),
                parsed.write.unwrap_or(blank),
                parsed.direction,
                parsed.next_state,
            );

            match self.mode {
                Mode::Normal => {
                    table.insert(transition);
                }
                Mode::Strict => table.insert_unique(transition).map_err(|e| match e {
                    TuringMachineError::DuplicateTransition { state, symbol, .. } => {
                        TuringMachineError::DuplicateTransition {
                            state,
                            symbol,
                            line: Some(line),
                        }
                    }
                    other => other,
                })?,
            }
        }

        let name = self
            .metadata
            .get("name")
            .map(String::as_str)
            .unwrap_or(DEFAULT_DEFINITION_NAME);
        let description = self
            .metadata
            .get("description")
            .map(String::as_str)
            .unwrap_or_default();

        let mut machine = TuringMachine::new(name, description);
        machine.configure(&initial_state, self.accept_states, self.reject_states, blank);
        if let Some(max_steps) = self.max_steps {
            machine.set_max_steps(max_steps);
        }
        machine.set_transitions(table);

        Ok(Definition {
            machine,
            input: self.input.trim().to_string(),
            metadata: self.metadata,
            alphabet: self.alphabet,
            config: self.config,
        })
    }
}

/// Returns the section named by a `[NAME]` line.
fn parse_header(line: &str) -> Option<Section> {
    let pair = DefinitionParser::parse(Rule::header, line).ok()?.next()?;
    pair.into_inner()
        .find(|p| p.as_rule() == Rule::section)
        .map(|p| Section::from_name(p.as_str().trim()))
}

/// Splits a `key: value` line on its first colon, trimming both halves.
fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let pair = DefinitionParser::parse(Rule::entry, line).ok()?.next()?;
    let mut key = None;
    let mut value = "";

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::key => key = Some(p.as_str().trim()),
            Rule::value => value = p.as_str().trim(),
            _ => {}
        }
    }

    key.map(|key| (key, value))
}

/// Splits a transition line into its `->`-separated sides and their trimmed fields.
fn split_transition(line: &str) -> Result<Vec<Vec<&str>>, TuringMachineError> {
    let pairs = DefinitionParser::parse(Rule::transition, line)
        .map_err(|e| TuringMachineError::ParseError(Box::new(e)))?;

    Ok(pairs
        .flat_map(|pair| pair.into_inner())
        .filter(|pair| pair.as_rule() == Rule::side)
        .map(parse_fields)
        .collect())
}

fn parse_fields(side: Pair<Rule>) -> Vec<&str> {
    side.into_inner()
        .filter(|p| p.as_rule() == Rule::field)
        .map(|p| p.as_str().trim())
        .collect()
}

/// Reads a symbol field: one character, or `None` (the blank symbol) when empty.
fn parse_symbol(field: &str, line_no: usize) -> Result<Option<Symbol>, TuringMachineError> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(symbol), None) => Ok(Some(symbol)),
        _ => Err(TuringMachineError::InvalidSymbol {
            symbol: field.to_string(),
            line: Some(line_no),
        }),
    }
}

/// Splits a comma-separated list, trimming items and dropping empty ones.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
