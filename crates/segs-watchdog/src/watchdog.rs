//! Wires the liveness check to the restart action.

use std::path::Path;

use segs_core::{ConfigResult, WatchdogConfig};
use segs_health::{LivenessChecker, LivenessReport};
use segs_restart::{CommandRunner, RestartStrategy};
use tracing::{debug, info, warn};

/// Load the config from `path`, or fall back to built-in defaults.
pub fn load_config(path: Option<&Path>) -> ConfigResult<WatchdogConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            WatchdogConfig::from_file(path)
        }
        None => {
            debug!("no config file given, using defaults");
            Ok(WatchdogConfig::default())
        }
    }
}

/// Outcome of one watchdog pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogRun {
    pub report: LivenessReport,
    /// Whether the restart sequence was issued. Says nothing about
    /// whether the restart worked.
    pub restarted: bool,
}

pub struct Watchdog {
    checker: LivenessChecker,
    strategy: RestartStrategy,
    runner: Box<dyn CommandRunner>,
}

impl Watchdog {
    pub fn new(
        checker: LivenessChecker,
        strategy: RestartStrategy,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            checker,
            strategy,
            runner,
        }
    }

    /// Build the checker and pick the restart strategy from config.
    pub fn from_config(config: &WatchdogConfig, runner: Box<dyn CommandRunner>) -> Self {
        Self::new(
            LivenessChecker::from_config(config),
            RestartStrategy::for_platform(&config.restart),
            runner,
        )
    }

    pub fn strategy(&self) -> &RestartStrategy {
        &self.strategy
    }

    /// Probe both ports and restart the service if either is down.
    pub async fn run_once(&self) -> WatchdogRun {
        let report = self.checker.check().await;

        if !report.needs_restart() {
            return WatchdogRun {
                report,
                restarted: false,
            };
        }

        warn!(
            service = %self.strategy.service(),
            strategy = self.strategy.name(),
            "restarting service"
        );
        self.strategy.restart(self.runner.as_ref()).await;
        info!(service = %self.strategy.service(), "restart sequence issued");

        WatchdogRun {
            report,
            restarted: true,
        }
    }
}
