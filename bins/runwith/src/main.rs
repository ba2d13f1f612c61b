use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use runwith_supervisor::{Supervisor, SupervisionOutcome};

mod cli;

use cli::Args;

/// Same code clap uses for usage errors.
const CONFIG_ERROR_EXIT_CODE: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Usage errors (bad flags, bad time spans, no command) exit with 2 here.
    let args = Args::parse();

    initialize_logging(args.log_level())?;

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("runwith: {}", e);
            return Ok(ExitCode::from(CONFIG_ERROR_EXIT_CODE));
        }
    };
    info!("Supervising {}", config);

    let report = Supervisor::new()
        .run(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Supervision of {} failed: {}", config.display_command(), e))?;

    debug!(
        "Supervision finished after {:?} (soft stop: {}, hard stop: {})",
        report.elapsed,
        report.soft_stop_requested(),
        report.hard_stop_requested()
    );

    match &report.outcome {
        SupervisionOutcome::Completed(status) => {
            info!("Forwarding {} as exit code {}", status, status.process_exit_code());
        }
        SupervisionOutcome::SpawnFailed(e) => eprintln!("runwith: {}", e),
    }

    Ok(ExitCode::from(report.exit_code()))
}

fn initialize_logging(level: &str) -> Result<()> {
    // Logs go to stderr; stdout belongs to the child.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
