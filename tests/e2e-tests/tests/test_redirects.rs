//! Standard stream and working directory redirection

use e2e_tests::assertions::{assert_exit_code, assert_file_contents};
use e2e_tests::run_test;
use std::fs;

#[test]
fn test_stdout_redirect() {
    run_test("Stdout Redirect", |runner| {
        let testexe = runner.testexe();

        let result = runner.run(["-o", "out.txt", testexe.as_str(), "--print", "hello world"])?;

        assert_exit_code(&result, 0)?;
        assert_file_contents(&runner.path("out.txt"), "hello world\n")?;
        if !result.stdout.is_empty() {
            return Err(format!("Child output leaked to runwith's stdout: {:?}", result.stdout));
        }
        Ok(())
    });
}

#[test]
fn test_stdout_redirect_truncates() {
    run_test("Stdout Truncate", |runner| {
        let testexe = runner.testexe();
        fs::write(runner.path("out.txt"), "stale contents that are longer\n")
            .map_err(|e| e.to_string())?;

        let result = runner.run(["-o", "out.txt", testexe.as_str(), "--print", "fresh"])?;

        assert_exit_code(&result, 0)?;
        assert_file_contents(&runner.path("out.txt"), "fresh\n")?;
        Ok(())
    });
}

#[test]
fn test_stderr_redirect() {
    run_test("Stderr Redirect", |runner| {
        let testexe = runner.testexe();

        let result = runner.run([
            "-e",
            "err.txt",
            testexe.as_str(),
            "--print-stderr",
            "something went wrong",
            "--exit-code",
            "1",
            "--run-ms",
            "10",
        ])?;

        assert_exit_code(&result, 1)?;
        assert_file_contents(&runner.path("err.txt"), "something went wrong\n")?;
        Ok(())
    });
}

#[test]
fn test_stdin_redirect() {
    run_test("Stdin Redirect", |runner| {
        let testexe = runner.testexe();
        fs::write(runner.path("in.txt"), "line one\nline two\n").map_err(|e| e.to_string())?;

        let result = runner.run([
            "-i",
            "in.txt",
            "-o",
            "out.txt",
            testexe.as_str(),
            "--echo-stdin",
        ])?;

        assert_exit_code(&result, 0)?;
        assert_file_contents(&runner.path("out.txt"), "line one\nline two\n")?;
        Ok(())
    });
}

#[test]
fn test_working_directory() {
    run_test("Working Directory", |runner| {
        let testexe = runner.testexe();
        let work = runner.path("work");
        fs::create_dir(&work).map_err(|e| e.to_string())?;

        // Redirect paths resolve against runwith's directory, not the child's.
        let result = runner.run([
            "-w",
            "work",
            "-o",
            "cwd.txt",
            testexe.as_str(),
            "--print-cwd",
        ])?;
        assert_exit_code(&result, 0)?;

        let printed = fs::read_to_string(runner.path("cwd.txt")).map_err(|e| e.to_string())?;
        let printed = fs::canonicalize(printed.trim()).map_err(|e| e.to_string())?;
        let expected = fs::canonicalize(&work).map_err(|e| e.to_string())?;
        if printed != expected {
            return Err(format!(
                "Child ran in {}, expected {}",
                printed.display(),
                expected.display()
            ));
        }
        Ok(())
    });
}
