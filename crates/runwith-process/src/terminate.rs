//! Process termination primitives.
//!
//! The supervisor only talks to the [`Terminator`] trait. The platform body
//! is picked once, at compile time, by [`PlatformTerminator`]:
//!
//! | Request | Unix | Windows |
//! |---------|------|---------|
//! | soft    | `SIGTERM` | `Ctrl+Break` to the child's process group |
//! | hard    | `SIGKILL` | `TerminateProcess` |

use runwith_common::{ProcessError, ProcessResult, StopKind};

/// Capability to ask a child process to stop.
///
/// Implementations must report failures instead of swallowing them: a lost
/// stop request means the child keeps running past its time limit.
pub trait Terminator: Send + Sync {
    /// Ask the process to exit; it may trap or ignore the request.
    fn request_soft_stop(&self, pid: u32) -> ProcessResult<()>;

    /// Terminate the process unconditionally.
    fn request_hard_stop(&self, pid: u32) -> ProcessResult<()>;

    fn request_stop(&self, pid: u32, kind: StopKind) -> ProcessResult<()> {
        match kind {
            StopKind::Soft => self.request_soft_stop(pid),
            StopKind::Hard => self.request_hard_stop(pid),
        }
    }
}

/// The terminator for the target platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformTerminator;

impl Terminator for PlatformTerminator {
    fn request_soft_stop(&self, pid: u32) -> ProcessResult<()> {
        terminate_gracefully(pid)
    }

    fn request_hard_stop(&self, pid: u32) -> ProcessResult<()> {
        force_kill(pid)
    }
}

/// Terminate a process gracefully (SIGTERM on Unix, Ctrl+Break on Windows).
pub fn terminate_gracefully(pid: u32) -> ProcessResult<()> {
    #[cfg(unix)]
    {
        send_signal(pid, nix::sys::signal::Signal::SIGTERM, StopKind::Soft)
    }

    #[cfg(windows)]
    {
        use std::time::Duration;

        crate::terminate_windows::send_ctrl_break(pid, Duration::from_secs(1))
            .map_err(|e| ProcessError::stop_failed(pid, StopKind::Soft, e))
    }
}

/// Force kill a process (SIGKILL on Unix, TerminateProcess on Windows).
pub fn force_kill(pid: u32) -> ProcessResult<()> {
    #[cfg(unix)]
    {
        send_signal(pid, nix::sys::signal::Signal::SIGKILL, StopKind::Hard)
    }

    #[cfg(windows)]
    {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::{OpenProcess, TerminateProcess, PROCESS_TERMINATE};

        unsafe {
            let handle = match OpenProcess(PROCESS_TERMINATE, false, pid) {
                Ok(h) if !h.is_invalid() => h,
                _ => {
                    return Err(ProcessError::stop_failed(
                        pid,
                        StopKind::Hard,
                        "Failed to open process for termination",
                    ));
                }
            };

            let result = TerminateProcess(handle, 1);
            let _ = CloseHandle(handle);

            result.map_err(|e| {
                ProcessError::stop_failed(pid, StopKind::Hard, format!("TerminateProcess failed: {}", e))
            })
        }
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: nix::sys::signal::Signal, kind: StopKind) -> ProcessResult<()> {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    // 0 and negative values address process groups.
    let raw = match i32::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => {
            return Err(ProcessError::stop_failed(
                pid,
                kind,
                format!("Invalid PID: {}", pid),
            ))
        }
    };

    match kill(Pid::from_raw(raw), signal) {
        Ok(()) => {
            tracing::debug!("Sent {} to PID {}", signal, pid);
            Ok(())
        }
        // Already exited; the wait that follows reports the status.
        Err(Errno::ESRCH) => {
            tracing::debug!("PID {} already gone when sending {}", pid, signal);
            Ok(())
        }
        Err(e) => Err(ProcessError::stop_failed(pid, kind, e.to_string())),
    }
}
