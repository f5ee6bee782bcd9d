//! This module provides the `DefinitionLoader` struct, responsible for loading machine
//! definitions from files, strings and directories.

use crate::parser::{parse_definition, Definition};
use crate::types::{Mode, TuringMachineError, MAX_DEFINITION_SIZE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of machine definition files.
pub const DEFINITION_EXTENSION: &str = "tm";

/// `DefinitionLoader` is a utility struct for loading machine definitions.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Loads a single definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Definition)` if the file is read and parsed successfully.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read or exceeds
    ///   `MAX_DEFINITION_SIZE`.
    /// * Any parse error from [`parse_definition`].
    pub fn load_definition(path: &Path) -> Result<Definition, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if content.len() > MAX_DEFINITION_SIZE {
            return Err(TuringMachineError::FileError(format!(
                "File {} is larger than {} bytes",
                path.display(),
                MAX_DEFINITION_SIZE
            )));
        }

        debug!(path = %path.display(), bytes = content.len(), "loading definition");
        Self::load_definition_from_string(&content)
    }

    /// Loads a single definition from the provided string content.
    pub fn load_definition_from_string(content: &str) -> Result<Definition, TuringMachineError> {
        parse_definition(content, Mode::Normal)
    }

    /// Loads every `.tm` file in a directory.
    ///
    /// Directories and files with other extensions are skipped. Each entry of the result
    /// is either the loaded definition with its path or the error for one file.
    pub fn load_definitions(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, Definition), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir()
                    || path
                        .extension()
                        .is_none_or(|ext| ext != DEFINITION_EXTENSION)
                {
                    return None;
                }

                match Self::load_definition(&path) {
                    Ok(definition) => Some(Ok((path, definition))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load definition from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID: &str = "[METADATA]\nname: Test Machine\n[CONFIG]\ninitial_state: q0\naccept_states: qf\n[TRANSITIONS]\nq0, a -> b, R, qf\n[INPUT]\na\n";

    fn write_file(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_definition() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");
        write_file(&file_path, VALID);

        let definition = DefinitionLoader::load_definition(&file_path).unwrap();
        assert_eq!(definition.machine.name(), "Test Machine");
        assert_eq!(definition.input, "a");
        assert!(definition.machine.transitions().contains("q0", 'a'));
    }

    #[test]
    fn test_load_invalid_definition() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");
        write_file(&file_path, "This is not a valid definition");

        let result = DefinitionLoader::load_definition(&file_path);
        assert_eq!(
            result.unwrap_err(),
            TuringMachineError::MissingConfig("initial_state".into())
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = DefinitionLoader::load_definition(&dir.path().join("absent.tm"));
        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_oversized_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("big.tm");
        let padding = format!("# {}\n", "x".repeat(MAX_DEFINITION_SIZE));
        write_file(&file_path, &format!("{padding}{VALID}"));

        let error = DefinitionLoader::load_definition(&file_path).unwrap_err();
        assert!(error.to_string().contains("larger than"));
    }

    #[test]
    fn test_load_definitions_from_directory() {
        let dir = tempdir().unwrap();

        write_file(&dir.path().join("valid.tm"), VALID);
        write_file(&dir.path().join("invalid.tm"), "[CONFIG]\ninitial_state: q0\n");
        write_file(&dir.path().join("ignored.txt"), "This file should be ignored");
        fs::create_dir(dir.path().join("nested.tm")).unwrap();

        let results = DefinitionLoader::load_definitions(dir.path());
        assert_eq!(results.len(), 2);

        let success_count = results.iter().filter(|result| result.is_ok()).count();
        let error_count = results.iter().filter(|result| result.is_err()).count();
        assert_eq!(success_count, 1);
        assert_eq!(error_count, 1);
    }

    #[test]
    fn test_load_definitions_missing_directory() {
        let dir = tempdir().unwrap();
        let results = DefinitionLoader::load_definitions(&dir.path().join("nope"));

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TuringMachineError::FileError(_))));
    }
}
