//! segs-watchdog — restart SEGS when its auth or RPC port goes silent.
//!
//! # Usage
//!
//! ```text
//! # crontab: every five minutes, built-in defaults
//! */5 * * * * /usr/local/bin/segs-watchdog
//!
//! segs-watchdog --config /etc/segs/watchdog.toml run --dry-run
//! segs-watchdog check --format json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(
    name = "segs-watchdog",
    about = "Restart SEGS when its auth or JSON-RPC port is unresponsive",
    version
)]
struct Cli {
    /// Path to a TOML config file. Built-in defaults are used when absent.
    #[arg(short, long, global = true, env = "SEGS_WATCHDOG_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Probe both ports and restart the service if either is down (default).
    Run {
        /// Log the restart commands instead of executing them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Probe both ports and print the result. Never restarts.
    ///
    /// Exits with status 1 when a restart would be needed.
    Check {
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = segs_watchdog::load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run { dry_run: false }) {
        Command::Run { dry_run } => commands::run::run(&config, dry_run).await,
        Command::Check { format } => {
            commands::check::check(&config, matches!(format, Format::Json)).await
        }
        Command::Config => commands::config::show(&config),
    }
}

/// Log to stderr. Quiet (`warn`) by default so a healthy cron run prints
/// nothing.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
