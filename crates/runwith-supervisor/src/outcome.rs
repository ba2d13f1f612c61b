//! Results of a supervision run.

use std::time::Duration;

use runwith_common::{ExitStatus, ProcessError};

use crate::state::{visited, StateTransition, SupervisionState};

/// Exit code reported when the child could not be launched.
pub const SPAWN_FAILURE_EXIT_CODE: u8 = 2;

/// How a supervision run ended.
///
/// A child killed at its deadline still ends as `Completed`, carrying the
/// status the OS reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisionOutcome {
    Completed(ExitStatus),
    SpawnFailed(ProcessError),
}

impl SupervisionOutcome {
    /// The exit code to hand back at the process boundary.
    pub fn exit_code(&self) -> u8 {
        match self {
            SupervisionOutcome::Completed(status) => status.process_exit_code(),
            SupervisionOutcome::SpawnFailed(_) => SPAWN_FAILURE_EXIT_CODE,
        }
    }

    pub fn status(&self) -> Option<ExitStatus> {
        match self {
            SupervisionOutcome::Completed(status) => Some(*status),
            SupervisionOutcome::SpawnFailed(_) => None,
        }
    }
}

/// Outcome plus what happened along the way.
#[derive(Debug, Clone)]
pub struct SupervisionReport {
    pub outcome: SupervisionOutcome,
    /// PID of the child, if it was spawned.
    pub pid: Option<u32>,
    /// Time from spawn until the exit status was observed.
    pub elapsed: Duration,
    pub transitions: Vec<StateTransition>,
}

impl SupervisionReport {
    pub fn soft_stop_requested(&self) -> bool {
        visited(&self.transitions, SupervisionState::SoftStopping)
    }

    pub fn hard_stop_requested(&self) -> bool {
        visited(&self.transitions, SupervisionState::HardStopping)
    }

    pub fn exit_code(&self) -> u8 {
        self.outcome.exit_code()
    }
}
