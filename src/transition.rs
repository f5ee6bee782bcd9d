//! This module defines the `TransitionTable`, the deterministic program of a machine.
//!
//! Rules are keyed by the composite `(state, symbol)` pair. Lookups are exact: there are
//! no wildcard rules, and a missing key is the machine's halting signal.

use crate::types::{Direction, Symbol, Transition, TuringMachineError};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Mapping from `(state, read symbol)` to a [`Transition`], kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    rules: Vec<Transition>,
    index: HashMap<(String, Symbol), usize>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `direction` (`L`, `R` or `S`, any case) and inserts the rule,
    /// replacing any rule already stored for `(state, read)`.
    pub fn add(
        &mut self,
        state: &str,
        read: Symbol,
        write: Symbol,
        direction: &str,
        next_state: &str,
    ) -> Result<(), TuringMachineError> {
        let direction = direction.parse::<Direction>()?;
        self.insert(Transition::new(state, read, write, direction, next_state));
        Ok(())
    }

    /// Inserts a rule, returning the one it replaced. A replaced rule keeps its
    /// original position in [`TransitionTable::all_transitions`].
    pub fn insert(&mut self, transition: Transition) -> Option<Transition> {
        let key = (transition.state.clone(), transition.read);
        match self.index.get(&key) {
            Some(&slot) => Some(std::mem::replace(&mut self.rules[slot], transition)),
            None => {
                self.index.insert(key, self.rules.len());
                self.rules.push(transition);
                None
            }
        }
    }

    /// Inserts a rule, failing instead of overwriting when the key is already taken.
    pub fn insert_unique(&mut self, transition: Transition) -> Result<(), TuringMachineError> {
        if self.contains(&transition.state, transition.read) {
            return Err(TuringMachineError::DuplicateTransition {
                state: transition.state,
                symbol: transition.read,
                line: None,
            });
        }

        self.insert(transition);
        Ok(())
    }

    /// Finds the rule for `state` reading `symbol`.
    pub fn lookup(&self, state: &str, symbol: Symbol) -> Option<&Transition> {
        self.index
            .get(&(state.to_string(), symbol))
            .map(|&slot| &self.rules[slot])
    }

    pub fn contains(&self, state: &str, symbol: Symbol) -> bool {
        self.lookup(state, symbol).is_some()
    }

    /// All rules in insertion order.
    pub fn all_transitions(&self) -> &[Transition] {
        &self.rules
    }

    /// Every state named by a rule, as source or as target.
    pub fn states(&self) -> BTreeSet<&str> {
        self.rules
            .iter()
            .flat_map(|t| [t.state.as_str(), t.next_state.as_str()])
            .collect()
    }

    /// Every symbol named by a rule, read or written.
    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.rules.iter().flat_map(|t| [t.read, t.write]).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Transition> for TransitionTable {
    /// Later rules overwrite earlier ones with the same key.
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        let mut table = Self::new();
        for transition in iter {
            table.insert(transition);
        }
        table
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transition function:")?;
        for transition in &self.rules {
            writeln!(f, "  {transition}")?;
        }
        Ok(())
    }
}
