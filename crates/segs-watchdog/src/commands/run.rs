//! `segs-watchdog run` — the unattended check-then-restart pass.

use std::process::ExitCode;

use segs_core::WatchdogConfig;
use segs_restart::{CommandRunner, DryRunRunner, ShellRunner};
use segs_watchdog::Watchdog;
use tracing::info;

/// Always exits 0 once the config loaded: probe failures and restart
/// failures are logged, not signalled.
pub async fn run(config: &WatchdogConfig, dry_run: bool) -> anyhow::Result<ExitCode> {
    let runner: Box<dyn CommandRunner> = if dry_run {
        Box::new(DryRunRunner)
    } else {
        Box::new(ShellRunner)
    };

    let watchdog = Watchdog::from_config(config, runner);
    info!(
        host = %config.host,
        strategy = watchdog.strategy().name(),
        dry_run,
        "watchdog pass starting"
    );

    let outcome = watchdog.run_once().await;
    info!(restarted = outcome.restarted, "watchdog pass finished");

    Ok(ExitCode::SUCCESS)
}
