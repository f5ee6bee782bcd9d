//! This module provides the pre-flight validation of definition files. It checks only the
//! structural markers a definition needs, without building a machine, and reports every
//! problem found so a front end can show them together before attempting a parse.

use std::fmt;

/// Sections a definition cannot do without.
pub const REQUIRED_SECTIONS: [&str; 2] = ["[CONFIG]", "[TRANSITIONS]"];

/// A structural problem found by [`validate`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ValidationIssue {
    /// A required section header does not appear anywhere in the text.
    MissingSection(&'static str),
    /// `[CONFIG]` is present but no `initial_state:` key is.
    MissingInitialState,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingSection(section) => {
                write!(f, "Missing required section: {section}")
            }
            ValidationIssue::MissingInitialState => {
                write!(f, "Missing 'initial_state' in [CONFIG]")
            }
        }
    }
}

/// Checks a definition's text for the required sections and the `initial_state` key.
///
/// The checks are literal substring searches, so they never fail on content they do not
/// understand. An empty result means the text is worth handing to the parser; it does not
/// guarantee that parsing succeeds.
pub fn validate(source: &str) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = REQUIRED_SECTIONS
        .into_iter()
        .filter(|section| !source.contains(section))
        .map(ValidationIssue::MissingSection)
        .collect();

    if source.contains("[CONFIG]") && !source.contains("initial_state:") {
        issues.push(ValidationIssue::MissingInitialState);
    }

    issues
}

/// Returns the issues as the human-readable lines shown to users.
pub fn describe(issues: &[ValidationIssue]) -> Vec<String> {
    issues.iter().map(ToString::to_string).collect()
}
