//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use runwith_common::ConfigResult;
use runwith_process::StdioRedirects;
use runwith_supervisor::SupervisionConfig;
use runwith_timespan::parse_timespan;

/// Run a command with redirected standard streams and an optional time limit.
///
/// When the time limit passes, the command receives a termination request;
/// if it is still running after the grace time (or no grace time was given),
/// it is killed. runwith exits with the command's exit status.
#[derive(Parser, Debug)]
#[command(name = "runwith", author, version, about)]
pub struct Args {
    /// File to use as the command's standard input
    #[arg(short = 'i', long = "stdin", value_name = "FILE")]
    pub stdin: Option<PathBuf>,

    /// File to write the command's standard output to
    #[arg(short = 'o', long = "stdout", value_name = "FILE")]
    pub stdout: Option<PathBuf>,

    /// File to write the command's standard error to
    #[arg(short = 'e', long = "stderr", value_name = "FILE")]
    pub stderr: Option<PathBuf>,

    /// Working directory for the command
    #[arg(short = 'w', long = "cwd", value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Time budget before termination starts (e.g. 1h30m, 200ms, .5s)
    #[arg(short = 't', long, value_name = "SPAN", value_parser = parse_timespan)]
    pub time_limit: Option<Duration>,

    /// Time between the termination request and the kill
    #[arg(short = 'g', long, value_name = "SPAN", value_parser = parse_timespan)]
    pub grace_time: Option<Duration>,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// The command to run, followed by its arguments
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl Args {
    /// Turn parsed flags into a validated supervision config.
    pub fn into_config(self) -> ConfigResult<SupervisionConfig> {
        SupervisionConfig::builder(self.command)
            .redirects(StdioRedirects {
                stdin: self.stdin,
                stdout: self.stdout,
                stderr: self.stderr,
            })
            .maybe_working_dir(self.cwd)
            .maybe_time_limit(self.time_limit)
            .maybe_grace_time(self.grace_time)
            .build()
    }

    /// Default log filter for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
