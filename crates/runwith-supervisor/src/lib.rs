//! # runwith supervisor
//!
//! Supervises exactly one child process per call: spawn it with the
//! requested redirections, wait for it under an optional time limit, and
//! escalate from a soft to a hard stop when the limit passes.
//!
//! ```rust,no_run
//! use runwith_supervisor::{supervise, SupervisionConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SupervisionConfig::builder(["sleep", "5"])
//!     .time_limit(Duration::from_millis(200))
//!     .grace_time(Duration::from_secs(1))
//!     .build()?;
//! let outcome = supervise(&config).await?;
//! std::process::exit(outcome.exit_code().into());
//! # }
//! ```

pub mod config;
pub mod outcome;
pub mod state;
pub mod supervisor;

pub use config::{SupervisionConfig, SupervisionConfigBuilder};
pub use outcome::{SupervisionOutcome, SupervisionReport, SPAWN_FAILURE_EXIT_CODE};
pub use state::{StateTransition, SupervisionState, SupervisionStateMachine};
pub use supervisor::{supervise, Supervisor};

pub use runwith_common::{ExitStatus, ProcessError, StopKind};
pub use runwith_process::{PlatformTerminator, StdioRedirects, Terminator};
