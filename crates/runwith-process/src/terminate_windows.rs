//! Windows soft termination via console control events.
//!
//! The child is spawned with `CREATE_NEW_PROCESS_GROUP`, so its PID is also
//! its process group id and `GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid)`
//! reaches it without interrupting the supervisor.

use std::sync::Mutex;
use std::time::Duration;
use windows::Win32::System::Console::{GenerateConsoleCtrlEvent, CTRL_BREAK_EVENT};

/// Console control events are process-wide; send them one at a time.
static CONSOLE_OPERATION_LOCK: Mutex<()> = Mutex::new(());

/// Send Ctrl+Break to the process group of `pid`.
///
/// The call runs on a helper thread and is abandoned after `timeout`.
pub fn send_ctrl_break(pid: u32, timeout: Duration) -> Result<(), String> {
    if pid == 0 {
        return Err(format!("Invalid PID: {}", pid));
    }

    let _lock = CONSOLE_OPERATION_LOCK
        .lock()
        .map_err(|e| format!("Failed to acquire console lock: {}", e))?;

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let result = generate_console_ctrl_event(pid);
        let _ = tx.send(result);
    });

    // On timeout the helper thread is abandoned, not joined. It ends when
    // the call returns or with the process; its send then finds no receiver.
    match rx.recv_timeout(timeout) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("Failed to send Ctrl+Break to PID {}: {}", pid, e)),
        Err(_) => Err(format!(
            "Timeout sending Ctrl+Break to PID {} after {:?}",
            pid, timeout
        )),
    }
}

fn generate_console_ctrl_event(pid: u32) -> Result<(), String> {
    unsafe {
        GenerateConsoleCtrlEvent(CTRL_BREAK_EVENT, pid)
            .map_err(|e| format!("GenerateConsoleCtrlEvent failed: {}", e))
    }
}
