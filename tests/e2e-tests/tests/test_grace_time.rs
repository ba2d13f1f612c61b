//! Soft stop followed by a grace period
//!
//! With a grace time, the child first gets a termination request. A child
//! that honours it exits with its own code; a child that ignores it is
//! killed once the grace time runs out.

#![cfg(unix)]

use e2e_tests::assertions::{
    assert_elapsed_at_least, assert_elapsed_below, assert_exit_code, assert_file_contents,
    assert_killed,
};
use e2e_tests::{run_test, wait_for_file, RunResult, RunningRunwith, RunwithRunner};
use std::time::Duration;

const TIME_LIMIT: Duration = Duration::from_secs(1);

/// Wait for testexe's ready file, then for runwith to exit.
///
/// The ready file is written once the stop handlers are installed; seeing it
/// before the time limit means the soft stop cannot beat them.
fn wait_ready_then_exit(
    runner: &RunwithRunner,
    running: RunningRunwith,
) -> Result<RunResult, String> {
    let ready = wait_for_file(&runner.path("ready.txt"), Duration::from_secs(10)).and_then(|()| {
        let waited = running.elapsed();
        if waited < TIME_LIMIT {
            println!("✓ testexe ready after {:?}", waited);
            Ok(())
        } else {
            Err(format!(
                "testexe was not ready before the time limit (after {:?})",
                waited
            ))
        }
    });

    // Always reap runwith, even when readiness failed.
    let result = running.wait()?;
    ready?;
    Ok(result)
}

#[test]
fn test_cooperative_child_exits_on_soft_stop() {
    run_test("Cooperative Soft Stop", |runner| {
        let testexe = runner.testexe();

        println!("Step 1: Running a child that exits with 7 on SIGTERM...");
        let running = runner.spawn([
            "-t",
            "1s",
            "-g",
            "10s",
            testexe.as_str(),
            "--stop-exit-code",
            "7",
            "--ready-file",
            "ready.txt",
            "--signal-ack-file",
            "ack.txt",
        ])?;
        let result = wait_ready_then_exit(runner, running)?;

        println!("Step 2: Checking the child's own exit code came through...");
        assert_exit_code(&result, 7)?;
        assert_elapsed_at_least(&result, TIME_LIMIT)?;
        assert_elapsed_below(&result, Duration::from_secs(10))?;
        assert_file_contents(&runner.path("ack.txt"), "SIGTERM\n")?;
        Ok(())
    });
}

#[test]
fn test_stubborn_child_is_killed_after_grace_time() {
    run_test("Stubborn Child Killed", |runner| {
        let testexe = runner.testexe();

        println!("Step 1: Running a child that ignores SIGTERM...");
        let running = runner.spawn([
            "-t",
            "1s",
            "-g",
            "300ms",
            testexe.as_str(),
            "--ignore-stop",
            "--ready-file",
            "ready.txt",
            "--signal-ack-file",
            "ack.txt",
        ])?;
        let result = wait_ready_then_exit(runner, running)?;

        println!("Step 2: Checking it saw the soft stop and was then killed...");
        assert_killed(&result)?;
        assert_elapsed_at_least(&result, TIME_LIMIT + Duration::from_millis(300))?;
        assert_file_contents(&runner.path("ack.txt"), "SIGTERM\n")?;
        Ok(())
    });
}
