//! `segs-watchdog config` — print the effective configuration.

use std::process::ExitCode;

use segs_core::WatchdogConfig;

pub fn show(config: &WatchdogConfig) -> anyhow::Result<ExitCode> {
    print!("{}", config.to_toml_string()?);
    Ok(ExitCode::SUCCESS)
}
