//! Runs the runwith binary for E2E testing

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wait_timeout::ChildExt;

use crate::{create_test_dir, get_runwith_path, get_testexe_path};

/// Upper bound on any single runwith invocation.
const SAFETY_TIMEOUT: Duration = Duration::from_secs(30);

/// What one runwith invocation left behind.
#[derive(Debug)]
pub struct RunResult {
    /// `None` when runwith itself died from a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Owns a scratch directory and launches runwith inside it.
pub struct RunwithRunner {
    runwith_path: PathBuf,
    testexe_path: PathBuf,
    test_dir: TempDir,
}

impl RunwithRunner {
    pub fn new(test_name: &str) -> Self {
        let runner = Self {
            runwith_path: get_runwith_path(),
            testexe_path: get_testexe_path(),
            test_dir: create_test_dir(test_name),
        };
        println!("Test directory: {}", runner.dir().display());
        runner
    }

    pub fn dir(&self) -> &Path {
        self.test_dir.path()
    }

    /// Path of a file inside the test directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir().join(name)
    }

    /// The testexe path, ready to pass as runwith's COMMAND.
    pub fn testexe(&self) -> String {
        self.testexe_path.to_string_lossy().into_owned()
    }

    /// Run runwith with `args` and wait for it to exit.
    pub fn run<I, S>(&self, args: I) -> Result<RunResult, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.spawn(args)?.wait()
    }

    /// Start runwith with `args` without waiting for it.
    ///
    /// runwith's own stdout and stderr go to files so that a child left
    /// behind can never hold a pipe open.
    pub fn spawn<I, S>(&self, args: I) -> Result<RunningRunwith, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let stdout_path = self.path("runwith.stdout");
        let stderr_path = self.path("runwith.stderr");
        let stdout = fs::File::create(&stdout_path)
            .map_err(|e| format!("Failed to create stdout file: {}", e))?;
        let stderr = fs::File::create(&stderr_path)
            .map_err(|e| format!("Failed to create stderr file: {}", e))?;

        let mut cmd = Command::new(&self.runwith_path);
        cmd.args(args)
            .current_dir(self.dir())
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr));

        println!("Running: {:?}", cmd);
        let started = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|e| format!("Failed to spawn runwith: {}", e))?;

        Ok(RunningRunwith {
            child,
            started,
            stdout_path,
            stderr_path,
        })
    }
}

/// A runwith process started by [`RunwithRunner::spawn`].
pub struct RunningRunwith {
    child: Child,
    started: Instant,
    stdout_path: PathBuf,
    stderr_path: PathBuf,
}

impl RunningRunwith {
    /// Time since runwith was started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Wait for runwith to exit and collect what it wrote.
    pub fn wait(mut self) -> Result<RunResult, String> {
        let status = match self.child.wait_timeout(SAFETY_TIMEOUT) {
            Ok(Some(status)) => status,
            Ok(None) => {
                self.child.kill().ok();
                self.child.wait().ok();
                return Err(format!(
                    "runwith did not exit within {} seconds",
                    SAFETY_TIMEOUT.as_secs()
                ));
            }
            Err(e) => return Err(format!("Error waiting for runwith: {}", e)),
        };
        let elapsed = self.started.elapsed();

        let result = RunResult {
            exit_code: status.code(),
            stdout: fs::read_to_string(&self.stdout_path).unwrap_or_default(),
            stderr: fs::read_to_string(&self.stderr_path).unwrap_or_default(),
            elapsed,
        };
        println!(
            "runwith exited with {:?} after {:?}\n[stdout] {:?}\n[stderr] {:?}",
            result.exit_code, result.elapsed, result.stdout, result.stderr
        );
        Ok(result)
    }
}

/// Wait until `path` exists.
pub fn wait_for_file(path: &Path, timeout: Duration) -> Result<(), String> {
    let start = Instant::now();

    while start.elapsed() < timeout {
        if path.exists() {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(10));
    }

    Err(format!(
        "{} did not appear within {} seconds",
        path.display(),
        timeout.as_secs()
    ))
}

/// Run one scenario with banners around it, panicking on failure.
pub fn run_test<F>(test_name: &str, scenario: F)
where
    F: FnOnce(&RunwithRunner) -> Result<(), String>,
{
    println!("\n========================================");
    println!("TEST: {}", test_name);
    println!("========================================\n");

    let slug = test_name.to_lowercase().replace(' ', "-");
    let runner = RunwithRunner::new(&slug);

    match scenario(&runner) {
        Ok(()) => {
            println!("\n========================================");
            println!("✓ TEST PASSED: {}", test_name);
            println!("========================================\n");
        }
        Err(e) => {
            println!("\n========================================");
            println!("✗ TEST FAILED: {}", test_name);
            println!("Error: {}", e);
            println!("========================================\n");
            panic!("Test failed: {}", e);
        }
    }
}
