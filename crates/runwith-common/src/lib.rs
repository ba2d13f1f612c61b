//! # runwith common
//!
//! Error types and small value types shared by the runwith crates.

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::{ConfigError, ConfigResult, ProcessError, ProcessResult};
pub use types::{display_command, ExitStatus, StopKind};
