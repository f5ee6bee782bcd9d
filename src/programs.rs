//! This module provides the catalog of built-in machines.
//!
//! Presets are definition files embedded at compile time and parsed once, in
//! [`Mode::Strict`], into an immutable table.

use crate::machine::TuringMachine;
use crate::parser::{parse_definition, Definition};
use crate::types::{Mode, TuringMachineError};
use tracing::warn;

// Embedded definitions, keyed by catalog key.
const PRESET_SOURCES: [(&str, &str); 5] = [
    ("binary_increment", include_str!("../machines/binary_increment.tm")),
    ("palindrome", include_str!("../machines/palindrome.tm")),
    ("unary_addition", include_str!("../machines/unary_addition.tm")),
    (
        "binary_multiplication",
        include_str!("../machines/binary_multiplication.tm"),
    ),
    ("copy_string", include_str!("../machines/copy_string.tm")),
];

lazy_static::lazy_static! {
    /// Every preset that parsed successfully, in catalog order.
    pub static ref PRESETS: Vec<Preset> = PRESET_SOURCES
        .iter()
        .filter_map(|&(key, source)| match Preset::from_source(key, source) {
            Ok(preset) => Some(preset),
            Err(e) => {
                warn!(key, error = %e, "failed to parse preset");
                None
            }
        })
        .collect();
}

/// A catalog entry: descriptive fields plus the definition that builds the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub key: &'static str,
    pub name: String,
    pub description: String,
    pub default_input: String,
    /// Free-form grouping, e.g. `decidable` or `computable`.
    pub category: String,
    source: &'static str,
}

impl Preset {
    fn from_source(key: &'static str, source: &'static str) -> Result<Self, TuringMachineError> {
        let Definition {
            machine,
            input,
            metadata,
            ..
        } = parse_definition(source, Mode::Strict)?;

        Ok(Self {
            key,
            name: machine.name().to_string(),
            description: machine.description().to_string(),
            default_input: input,
            category: metadata.get("category").cloned().unwrap_or_default(),
            source,
        })
    }

    /// Builds a fresh, configured machine with no tape loaded.
    pub fn build(&self) -> Result<TuringMachine, TuringMachineError> {
        parse_definition(self.source, Mode::Strict).map(|definition| definition.machine)
    }

    /// The definition text the preset is built from.
    pub fn source(&self) -> &'static str {
        self.source
    }
}

/// Read-only access to [`PRESETS`].
pub struct Catalog;

impl Catalog {
    /// All presets in catalog order.
    pub fn presets() -> &'static [Preset] {
        &PRESETS
    }

    /// Finds a preset by its key.
    pub fn get(key: &str) -> Result<&'static Preset, TuringMachineError> {
        PRESETS
            .iter()
            .find(|preset| preset.key == key)
            .ok_or_else(|| TuringMachineError::UnknownPreset(key.to_string()))
    }

    pub fn keys() -> Vec<&'static str> {
        PRESETS.iter().map(|preset| preset.key).collect()
    }

    /// Presets whose key or name contains `query`, ignoring case.
    pub fn search(query: &str) -> Vec<&'static Preset> {
        let query = query.to_lowercase();
        PRESETS
            .iter()
            .filter(|preset| {
                preset.key.contains(&query) || preset.name.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn by_category(category: &str) -> Vec<&'static Preset> {
        PRESETS
            .iter()
            .filter(|preset| preset.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Builds the preset's machine and loads its default input onto the tape.
    pub fn load(key: &str) -> Result<(TuringMachine, String), TuringMachineError> {
        let preset = Self::get(key)?;
        let mut machine = preset.build()?;
        machine.load_tape(&preset.default_input);
        Ok((machine, preset.default_input.clone()))
    }
}
