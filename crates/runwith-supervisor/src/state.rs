//! Supervision state machine.
//!
//! ```text
//! Spawning ──► Running ──────────────────────────────► Completed
//!    │            │                                      ▲  ▲
//!    ▼            ├──► SoftStopping ─────────────────────┘  │
//! SpawnFailed     │         │                               │
//!                 │         ▼                               │
//!                 └──► HardStopping ────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use runwith_common::{ProcessError, ProcessResult};
use std::fmt;

/// Where one supervision run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisionState {
    /// Child is being launched
    Spawning,
    /// Child is running, deadline (if any) not reached
    Running,
    /// Soft stop sent, waiting out the grace time
    SoftStopping,
    /// Hard stop sent, waiting for the child to die
    HardStopping,
    /// Exit status observed
    Completed,
    /// Child could not be launched
    SpawnFailed,
}

impl fmt::Display for SupervisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupervisionState::Spawning => write!(f, "spawning"),
            SupervisionState::Running => write!(f, "running"),
            SupervisionState::SoftStopping => write!(f, "soft_stopping"),
            SupervisionState::HardStopping => write!(f, "hard_stopping"),
            SupervisionState::Completed => write!(f, "completed"),
            SupervisionState::SpawnFailed => write!(f, "spawn_failed"),
        }
    }
}

impl SupervisionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SupervisionState::Completed | SupervisionState::SpawnFailed)
    }

    /// True while a stop request is outstanding.
    pub fn is_stopping(&self) -> bool {
        matches!(
            self,
            SupervisionState::SoftStopping | SupervisionState::HardStopping
        )
    }
}

/// A state change with its timestamp and optional reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from_state: SupervisionState,
    pub to_state: SupervisionState,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Validates and records transitions for one supervision run.
#[derive(Debug, Clone)]
pub struct SupervisionStateMachine {
    label: String,
    current_state: SupervisionState,
    history: Vec<StateTransition>,
}

impl SupervisionStateMachine {
    /// New machine in `Spawning`. `label` names the run in logs and errors.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            current_state: SupervisionState::Spawning,
            history: Vec::new(),
        }
    }

    pub fn current_state(&self) -> SupervisionState {
        self.current_state
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    pub fn into_history(self) -> Vec<StateTransition> {
        self.history
    }

    pub fn is_valid_transition(&self, target: SupervisionState) -> bool {
        use SupervisionState::*;

        matches!(
            (self.current_state, target),
            (Spawning, Running)
                | (Spawning, SpawnFailed)
                | (Running, Completed)
                | (Running, SoftStopping)
                | (Running, HardStopping)
                | (SoftStopping, Completed)
                | (SoftStopping, HardStopping)
                | (HardStopping, Completed)
        )
    }

    pub fn transition_to(
        &mut self,
        target: SupervisionState,
        reason: Option<String>,
    ) -> ProcessResult<()> {
        if !self.is_valid_transition(target) {
            return Err(ProcessError::invalid_state(
                &self.label,
                format!("a state reachable from {}", self.current_state),
                target.to_string(),
            ));
        }

        let transition = StateTransition {
            from_state: self.current_state,
            to_state: target,
            timestamp: Utc::now(),
            reason,
        };
        tracing::debug!(
            "{} transitioned from {} to {}",
            self.label,
            transition.from_state,
            transition.to_state
        );
        self.current_state = target;
        self.history.push(transition);
        Ok(())
    }

    pub fn transition_to_running(&mut self, pid: u32) -> ProcessResult<()> {
        self.transition_to(SupervisionState::Running, Some(format!("spawned as PID {}", pid)))
    }

    pub fn transition_to_spawn_failed(&mut self, reason: String) -> ProcessResult<()> {
        self.transition_to(SupervisionState::SpawnFailed, Some(reason))
    }

    pub fn transition_to_soft_stopping(&mut self) -> ProcessResult<()> {
        self.transition_to(
            SupervisionState::SoftStopping,
            Some("time limit exceeded".to_string()),
        )
    }

    pub fn transition_to_hard_stopping(&mut self, reason: &str) -> ProcessResult<()> {
        self.transition_to(SupervisionState::HardStopping, Some(reason.to_string()))
    }

    pub fn transition_to_completed(&mut self, status: impl fmt::Display) -> ProcessResult<()> {
        self.transition_to(SupervisionState::Completed, Some(status.to_string()))
    }

    /// Whether the run ever entered `state`.
    pub fn visited(&self, state: SupervisionState) -> bool {
        visited(&self.history, state)
    }
}

pub(crate) fn visited(history: &[StateTransition], state: SupervisionState) -> bool {
    history.iter().any(|t| t.to_state == state)
}
