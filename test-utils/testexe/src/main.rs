use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::time::SystemTime;
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Test executable for runwith end-to-end testing
#[derive(Parser, Debug)]
#[command(name = "testexe")]
#[command(about = "Scriptable child process for supervisor testing", long_about = None)]
struct Args {
    /// Milliseconds to run before exiting on its own (0 = run until stopped)
    #[arg(long, default_value = "0")]
    run_ms: u64,

    /// Exit code when the run duration ends
    #[arg(long, default_value = "0")]
    exit_code: i32,

    /// Exit code when leaving because of a stop request (defaults to --exit-code)
    #[arg(long)]
    stop_exit_code: Option<i32>,

    /// Keep running after SIGTERM / Ctrl+Break
    #[arg(long)]
    ignore_stop: bool,

    /// Line to write to stdout at startup (repeatable)
    #[arg(long)]
    print: Vec<String>,

    /// Line to write to stderr at startup (repeatable)
    #[arg(long)]
    print_stderr: Vec<String>,

    /// Copy stdin to stdout before doing anything else
    #[arg(long)]
    echo_stdin: bool,

    /// Write the current directory to stdout at startup
    #[arg(long)]
    print_cwd: bool,

    /// Write this file once stop handlers are installed
    #[arg(long)]
    ready_file: Option<PathBuf>,

    /// Write this file each time a stop request arrives
    #[arg(long)]
    signal_ack_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Stderr only, and quiet unless RUST_LOG asks: tests inspect both streams.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    info!("Starting testexe with args: {:?}", args);

    let mut stop = match StopSignal::install() {
        Ok(stop) => stop,
        Err(e) => {
            error!("Failed to setup stop handler: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &args.ready_file {
        if let Err(e) = atomic_write_text(path, "ready\n") {
            error!("Failed to write ready file {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }

    if let Err(e) = write_startup_output(&args).await {
        error!("Failed to write output: {}", e);
        std::process::exit(1);
    }

    let run = async {
        if args.run_ms == 0 {
            std::future::pending::<()>().await;
        } else {
            sleep(Duration::from_millis(args.run_ms)).await;
        }
    };
    tokio::pin!(run);

    let code = loop {
        tokio::select! {
            _ = &mut run => {
                info!("Run duration ({} ms) reached, exiting", args.run_ms);
                break args.exit_code;
            }
            name = stop.recv() => {
                info!("Received {}", name);
                if let Some(path) = &args.signal_ack_file {
                    if let Err(e) = atomic_write_text(path, &format!("{}\n", name)) {
                        error!("Failed to write signal ack file {}: {}", path.display(), e);
                    }
                }
                if args.ignore_stop {
                    warn!("Ignoring {}", name);
                    continue;
                }
                break args.stop_exit_code.unwrap_or(args.exit_code);
            }
        }
    };

    let _ = std::io::stdout().flush();
    info!("Testexe stopped with exit code {}", code);
    std::process::exit(code);
}

async fn write_startup_output(args: &Args) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();

    if args.echo_stdin {
        tokio::io::copy(&mut tokio::io::stdin(), &mut stdout).await?;
    }
    if args.print_cwd {
        let cwd = std::env::current_dir()?;
        stdout.write_all(format!("{}\n", cwd.display()).as_bytes()).await?;
    }
    for line in &args.print {
        stdout.write_all(format!("{}\n", line).as_bytes()).await?;
    }
    stdout.flush().await?;

    let mut stderr = tokio::io::stderr();
    for line in &args.print_stderr {
        stderr.write_all(format!("{}\n", line).as_bytes()).await?;
    }
    stderr.flush().await
}

/// SIGTERM/SIGINT on Unix, Ctrl+Break/Ctrl+C on Windows.
struct StopSignal {
    #[cfg(unix)]
    term: tokio::signal::unix::Signal,
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_break: tokio::signal::windows::CtrlBreak,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl StopSignal {
    fn install() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            Ok(Self {
                term: signal(SignalKind::terminate())?,
                interrupt: signal(SignalKind::interrupt())?,
            })
        }

        #[cfg(windows)]
        {
            Ok(Self {
                ctrl_break: tokio::signal::windows::ctrl_break()?,
                ctrl_c: tokio::signal::windows::ctrl_c()?,
            })
        }
    }

    async fn recv(&mut self) -> &'static str {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.term.recv() => "SIGTERM",
                _ = self.interrupt.recv() => "SIGINT",
            }
        }

        #[cfg(windows)]
        {
            tokio::select! {
                _ = self.ctrl_break.recv() => "Ctrl+Break",
                _ = self.ctrl_c.recv() => "Ctrl+C",
            }
        }
    }
}

fn atomic_write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "ack".to_string());

    let tmp_path = path.with_file_name(format!("{file_name}.tmp-{pid}-{nanos}"));
    std::fs::write(&tmp_path, contents)?;

    // Rename over an existing file fails on Windows.
    #[cfg(windows)]
    {
        let _ = std::fs::remove_file(path);
    }

    std::fs::rename(&tmp_path, path)
}
