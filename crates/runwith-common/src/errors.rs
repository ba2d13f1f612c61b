//! Error types for runwith.
//!
//! Two families of errors exist:
//!
//! - [`ConfigError`]: detected while assembling a configuration, before any
//!   process is spawned (malformed time span, missing command).
//! - [`ProcessError`]: raised while driving the child process (spawn
//!   failure, failed termination request, failed wait).
//!
//! ```rust
//! use runwith_common::{ProcessError, ProcessResult};
//!
//! fn spawn() -> ProcessResult<u32> {
//!     Err(ProcessError::spawn_failed("[\"nope\"]", "No such file or directory"))
//! }
//!
//! let err = spawn().unwrap_err();
//! assert!(err.to_string().starts_with("Invalid command"));
//! ```

use thiserror::Error;

use crate::types::StopKind;

/// Result type for configuration assembly.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for process operations.
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;

/// Errors found while building a supervision configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration string did not match the time span grammar.
    #[error("Invalid time span \"{input}\".")]
    InvalidTimespan { input: String },

    /// No command tokens were given.
    #[error("No command given")]
    MissingCommand,

    /// The first command token is empty.
    #[error("Command {command} has an empty program name")]
    EmptyProgram { command: String },
}

impl ConfigError {
    pub fn invalid_timespan(input: impl Into<String>) -> Self {
        Self::InvalidTimespan {
            input: input.into(),
        }
    }

    pub fn empty_program(command: impl Into<String>) -> Self {
        Self::EmptyProgram {
            command: command.into(),
        }
    }
}

/// Errors raised while supervising a child process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Invalid command {command}: {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("Failed to send {kind} stop to process {pid}: {reason}")]
    StopFailed {
        pid: u32,
        kind: StopKind,
        reason: String,
    },

    #[error("Failed to wait for process {pid}: {reason}")]
    WaitFailed { pid: u32, reason: String },

    #[error("Process state error: {id} - expected {expected}, got {actual}")]
    InvalidState {
        id: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to check process {pid}: {reason}")]
    CheckFailed { pid: u32, reason: String },
}

impl ProcessError {
    pub fn spawn_failed(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            command: command.into(),
            reason: reason.into(),
        }
    }

    pub fn stop_failed(pid: u32, kind: StopKind, reason: impl Into<String>) -> Self {
        Self::StopFailed {
            pid,
            kind,
            reason: reason.into(),
        }
    }

    pub fn wait_failed(pid: u32, reason: impl Into<String>) -> Self {
        Self::WaitFailed {
            pid,
            reason: reason.into(),
        }
    }

    pub fn invalid_state(
        id: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            id: id.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn check_failed(pid: u32, reason: impl Into<String>) -> Self {
        Self::CheckFailed {
            pid,
            reason: reason.into(),
        }
    }

    /// True for errors that happen before a child exists.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, Self::SpawnFailed { .. })
    }
}
