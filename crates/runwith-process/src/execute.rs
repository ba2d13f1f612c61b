//! Process spawning with standard stream redirection.

use std::fs::File;
use std::path::{Path, PathBuf};

use runwith_common::{display_command, ProcessError, ProcessResult};
use tokio::process::{Child, Command};
use tracing::debug;

use crate::validation::validate_working_directory;

/// Files that replace the child's standard streams.
///
/// Streams without a path are inherited from the supervising process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StdioRedirects {
    /// Read as the child's standard input.
    pub stdin: Option<PathBuf>,
    /// Created (or truncated) and used as the child's standard output.
    pub stdout: Option<PathBuf>,
    /// Created (or truncated) and used as the child's standard error.
    pub stderr: Option<PathBuf>,
}

/// Spawn `command` with the given redirections and working directory.
///
/// Every failure (empty command, bad working directory, redirection file
/// that cannot be opened, executable that cannot be started) is reported as
/// [`ProcessError::SpawnFailed`] carrying the rendered command. The child is
/// killed if its handle is dropped before it has been waited on.
pub fn spawn_child(
    command: &[String],
    redirects: &StdioRedirects,
    working_dir: Option<&Path>,
) -> ProcessResult<Child> {
    let shown = display_command(command);
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ProcessError::spawn_failed(&shown, "command is empty"))?;

    let mut cmd = Command::new(program);
    cmd.args(args).kill_on_drop(true);

    if let Some(dir) = working_dir {
        validate_working_directory(&shown, dir)?;
        cmd.current_dir(dir);
    }

    if let Some(path) = &redirects.stdin {
        cmd.stdin(open_redirect(&shown, "stdin", path, |p| File::open(p))?);
    }
    if let Some(path) = &redirects.stdout {
        cmd.stdout(open_redirect(&shown, "stdout", path, |p| File::create(p))?);
    }
    if let Some(path) = &redirects.stderr {
        cmd.stderr(open_redirect(&shown, "stderr", path, |p| File::create(p))?);
    }

    // Own process group so Ctrl+Break reaches the child and not us.
    #[cfg(windows)]
    {
        const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;
        cmd.creation_flags(CREATE_NEW_PROCESS_GROUP);
    }

    let child = cmd
        .spawn()
        .map_err(|e| ProcessError::spawn_failed(&shown, e.to_string()))?;
    debug!("Spawned {} (PID: {:?})", shown, child.id());
    Ok(child)
}

fn open_redirect(
    command: &str,
    stream: &str,
    path: &Path,
    open: impl FnOnce(&Path) -> std::io::Result<File>,
) -> ProcessResult<File> {
    open(path).map_err(|e| {
        ProcessError::spawn_failed(
            command,
            format!("cannot open {} file {}: {}", stream, path.display(), e),
        )
    })
}
