//! Validation of commands and working directories.

use std::path::Path;

use runwith_common::{display_command, ConfigError, ConfigResult, ProcessError, ProcessResult};

/// Validate that a command has at least one token and a non-empty program.
pub fn validate_command(command: &[String]) -> ConfigResult<()> {
    match command.first() {
        None => Err(ConfigError::MissingCommand),
        Some(program) if program.is_empty() => {
            Err(ConfigError::empty_program(display_command(command)))
        }
        Some(_) => Ok(()),
    }
}

/// Validate that `dir` exists and is a directory.
///
/// `command` is the rendered argv, used to label the error.
pub fn validate_working_directory(command: &str, dir: &Path) -> ProcessResult<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ProcessError::spawn_failed(
            command,
            format!("working directory {} is not a directory", dir.display()),
        )),
        Err(e) => Err(ProcessError::spawn_failed(
            command,
            format!("working directory {}: {}", dir.display(), e),
        )),
    }
}
