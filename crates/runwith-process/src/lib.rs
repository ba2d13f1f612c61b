//! # runwith process
//!
//! Low-level process operations used by the supervisor.
//!
//! This crate provides cross-platform primitives for:
//! - Spawning a child with redirected standard streams
//! - Soft and hard termination behind the [`Terminator`] capability
//! - Process existence checks
//! - Command and working directory validation

pub mod check;
pub mod execute;
pub mod terminate;
pub mod validation;

#[cfg(windows)]
pub mod terminate_windows;

// Re-export main types
pub use check::*;
pub use execute::*;
pub use terminate::*;
pub use validation::*;
