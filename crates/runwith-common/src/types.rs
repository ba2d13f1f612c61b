//! Value types shared across runwith crates.

use std::fmt;

/// Which termination request is being sent to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopKind {
    /// Catchable request (SIGTERM, Ctrl+Break).
    Soft,
    /// Unconditional termination (SIGKILL, TerminateProcess).
    Hard,
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopKind::Soft => write!(f, "soft"),
            StopKind::Hard => write!(f, "hard"),
        }
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The child exited with this code.
    Exited(i32),
    /// The child was killed by this signal (Unix only).
    Signaled(i32),
}

impl ExitStatus {
    /// Exit code, negated signal number for signal deaths.
    pub fn code(&self) -> i32 {
        match *self {
            ExitStatus::Exited(code) => code,
            ExitStatus::Signaled(signal) => -signal,
        }
    }

    /// The byte reported at the process boundary.
    ///
    /// Behaves like passing [`code`](Self::code) to `exit(2)`: only the low
    /// eight bits survive, so a SIGKILL death becomes 247.
    pub fn process_exit_code(&self) -> u8 {
        (self.code() & 0xff) as u8
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }

    pub fn signal(&self) -> Option<i32> {
        match *self {
            ExitStatus::Signaled(signal) => Some(signal),
            ExitStatus::Exited(_) => None,
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => ExitStatus::Exited(code),
            #[cfg(unix)]
            None => {
                use std::os::unix::process::ExitStatusExt;
                ExitStatus::Signaled(status.signal().unwrap_or_default())
            }
            #[cfg(not(unix))]
            None => ExitStatus::Exited(-1),
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit code {}", code),
            ExitStatus::Signaled(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// Render an argv the way it appears in user-facing messages.
pub fn display_command(command: &[String]) -> String {
    format!("{:?}", command)
}
