//! The supervision loop.
//!
//! One call to [`Supervisor::run`] spawns one child and owns its handle
//! until the exit status is observed:
//!
//! 1. wait for natural exit, bounded by the time limit (if any);
//! 2. at the deadline, send a soft stop and wait out the grace time (if any);
//! 3. then send a hard stop and wait for the child without bound.
//!
//! Waits use tokio's deadline primitives directly on `Child::wait`, so no
//! background waiter competes with the escalation for the child.

use std::time::Duration;

use runwith_common::{ExitStatus, ProcessError, ProcessResult};
use runwith_process::{spawn_child, PlatformTerminator, Terminator};
use runwith_timespan::format_timespan;
use tokio::process::Child;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use crate::config::SupervisionConfig;
use crate::outcome::{SupervisionOutcome, SupervisionReport};
use crate::state::SupervisionStateMachine;

/// Supervise one child with the platform terminator.
pub async fn supervise(config: &SupervisionConfig) -> ProcessResult<SupervisionOutcome> {
    Supervisor::new().run(config).await.map(|report| report.outcome)
}

/// Drives a child process through spawn, deadline and escalation.
#[derive(Debug, Clone, Default)]
pub struct Supervisor<T = PlatformTerminator> {
    terminator: T,
}

impl Supervisor<PlatformTerminator> {
    pub fn new() -> Self {
        Self::with_terminator(PlatformTerminator)
    }
}

impl<T: Terminator> Supervisor<T> {
    pub fn with_terminator(terminator: T) -> Self {
        Self { terminator }
    }

    pub fn terminator(&self) -> &T {
        &self.terminator
    }

    /// Run `config` to completion.
    ///
    /// Spawn failures are part of the outcome. `Err` is reserved for
    /// failures after the child exists: a stop request that could not be
    /// delivered, or a wait that failed. The child is killed when the
    /// handle is dropped on those paths.
    pub async fn run(&self, config: &SupervisionConfig) -> ProcessResult<SupervisionReport> {
        let label = config.display_command();
        let mut machine = SupervisionStateMachine::new(label.clone());

        let mut child = match spawn_child(config.command(), config.redirects(), config.working_dir()) {
            Ok(child) => child,
            Err(err) => {
                debug!("Spawn failed: {}", err);
                machine.transition_to_spawn_failed(err.to_string())?;
                return Ok(SupervisionReport {
                    outcome: SupervisionOutcome::SpawnFailed(err),
                    pid: None,
                    elapsed: Duration::ZERO,
                    transitions: machine.into_history(),
                });
            }
        };

        let started = Instant::now();
        let pid = child
            .id()
            .ok_or_else(|| ProcessError::wait_failed(0, format!("{} has no PID after spawn", label)))?;
        machine.transition_to_running(pid)?;
        info!("Started {} (PID: {})", label, pid);

        let status = match config.time_limit() {
            None => wait_for_exit(&mut child, pid).await?,
            // `timeout` saturates limits too large to add to an Instant.
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(result) => result.map_err(|e| ProcessError::wait_failed(pid, e.to_string()))?,
                Err(_) => {
                    warn!(
                        "{} (PID: {}) exceeded time limit of {}",
                        label,
                        pid,
                        format_timespan(limit)
                    );
                    self.escalate(&mut child, pid, config.grace_time(), &mut machine)
                        .await?
                }
            },
        };

        let status = ExitStatus::from(status);
        machine.transition_to_completed(status)?;
        info!("{} (PID: {}) finished with {}", label, pid, status);

        Ok(SupervisionReport {
            outcome: SupervisionOutcome::Completed(status),
            pid: Some(pid),
            elapsed: started.elapsed(),
            transitions: machine.into_history(),
        })
    }

    /// Soft stop (when a grace time is set), then hard stop if still alive.
    async fn escalate(
        &self,
        child: &mut Child,
        pid: u32,
        grace: Option<Duration>,
        machine: &mut SupervisionStateMachine,
    ) -> ProcessResult<std::process::ExitStatus> {
        match grace {
            Some(grace) => {
                machine.transition_to_soft_stopping()?;
                self.terminator.request_soft_stop(pid)?;
                debug!(
                    "Soft stop sent to PID {}, waiting up to {}",
                    pid,
                    format_timespan(grace)
                );

                if let Ok(result) = timeout(grace, child.wait()).await {
                    return result.map_err(|e| ProcessError::wait_failed(pid, e.to_string()));
                }

                warn!(
                    "PID {} still running after grace time of {}, forcing termination",
                    pid,
                    format_timespan(grace)
                );
                machine.transition_to_hard_stopping("grace time expired")?;
            }
            None => machine.transition_to_hard_stopping("time limit exceeded")?,
        }

        self.terminator.request_hard_stop(pid)?;
        wait_for_exit(child, pid).await
    }
}

async fn wait_for_exit(child: &mut Child, pid: u32) -> ProcessResult<std::process::ExitStatus> {
    child
        .wait()
        .await
        .map_err(|e| ProcessError::wait_failed(pid, e.to_string()))
}
