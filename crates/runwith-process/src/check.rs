//! Process existence checking.

use runwith_common::{ProcessError, ProcessResult};

/// Check if a process with the given PID exists.
///
/// On Unix this uses `kill(pid, 0)`, which sends nothing but reports whether
/// the PID is taken (zombies count as existing until reaped). On Windows it
/// uses `OpenProcess`.
///
/// # Returns
///
/// * `Ok(true)` - Process exists
/// * `Ok(false)` - Process does not exist
/// * `Err(_)` - The check itself failed
///
/// ```rust,no_run
/// use runwith_process::process_exists;
///
/// if process_exists(1234).unwrap() {
///     println!("Process 1234 is running");
/// }
/// ```
pub fn process_exists(pid: u32) -> ProcessResult<bool> {
    #[cfg(unix)]
    {
        process_exists_unix(pid)
    }

    #[cfg(windows)]
    {
        process_exists_windows(pid)
    }
}

#[cfg(unix)]
fn process_exists_unix(pid: u32) -> ProcessResult<bool> {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let raw = match i32::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => return Ok(false),
    };

    match kill(Pid::from_raw(raw), None) {
        Ok(_) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        // Exists, but belongs to someone else.
        Err(Errno::EPERM) => Ok(true),
        Err(e) => Err(ProcessError::check_failed(pid, e.to_string())),
    }
}

#[cfg(windows)]
fn process_exists_windows(pid: u32) -> ProcessResult<bool> {
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};

    // HRESULT forms of the Win32 error codes.
    const E_INVALID_PARAMETER: i32 = 0x8007_0057_u32 as i32;
    const E_ACCESS_DENIED: i32 = 0x8007_0005_u32 as i32;

    let handle: HANDLE = match unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) } {
        Ok(handle) => handle,
        // Unknown PID.
        Err(e) if e.code().0 == E_INVALID_PARAMETER => return Ok(false),
        // Same as EPERM on Unix: taken, just not ours.
        Err(e) if e.code().0 == E_ACCESS_DENIED => return Ok(true),
        Err(e) => return Err(ProcessError::check_failed(pid, e.to_string())),
    };

    let _ = unsafe { CloseHandle(handle) };
    Ok(true)
}
