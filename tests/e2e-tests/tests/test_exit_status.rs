//! Exit status forwarding
//!
//! runwith exits with whatever code its child exits with when no time
//! limit gets in the way.

use e2e_tests::assertions::{assert_elapsed_below, assert_exit_code, assert_file_missing};
use e2e_tests::run_test;
use std::time::Duration;

#[test]
fn test_exit_code_is_forwarded() {
    run_test("Exit Code Forwarded", |runner| {
        let testexe = runner.testexe();

        for code in [0, 1, 42] {
            let code_arg = code.to_string();
            let result = runner.run([
                testexe.as_str(),
                "--run-ms",
                "10",
                "--exit-code",
                code_arg.as_str(),
            ])?;
            assert_exit_code(&result, code)?;
        }
        Ok(())
    });
}

#[test]
fn test_child_finishing_within_limit_is_not_stopped() {
    run_test("Finish Within Limit", |runner| {
        let testexe = runner.testexe();
        let ack = runner.path("ack.txt");

        let result = runner.run([
            "-t",
            "10s",
            "-g",
            "1s",
            testexe.as_str(),
            "--run-ms",
            "100",
            "--exit-code",
            "3",
            "--signal-ack-file",
            "ack.txt",
        ])?;

        assert_exit_code(&result, 3)?;
        assert_elapsed_below(&result, Duration::from_secs(5))?;
        assert_file_missing(&ack)?;
        Ok(())
    });
}

#[test]
fn test_child_hyphen_arguments_pass_through() {
    run_test("Hyphen Arguments", |runner| {
        let testexe = runner.testexe();

        // Flags after COMMAND belong to the child.
        let result = runner.run([testexe.as_str(), "--exit-code", "5", "--run-ms", "10"])?;
        assert_exit_code(&result, 5)?;
        Ok(())
    });
}
