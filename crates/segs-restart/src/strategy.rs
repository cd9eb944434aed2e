//! Restart strategies — systemd and Windows service control.

use std::time::Duration;

use segs_core::{RestartConfig, RestartPlatform};
use tracing::warn;

use crate::runner::{CommandRunner, ServiceCommand};

/// How to restart the monitored service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartStrategy {
    /// One `systemctl restart`, optionally through `sudo`.
    Systemd { service: String, use_sudo: bool },
    /// `sc stop`, a fixed pause for teardown, then `sc start`.
    ServiceControl { service: String, wait: Duration },
}

impl RestartStrategy {
    /// Select the strategy from config, resolving `auto` against the
    /// platform this binary was built for.
    pub fn for_platform(config: &RestartConfig) -> Self {
        let windows = match config.platform {
            RestartPlatform::Auto => cfg!(windows),
            RestartPlatform::Windows => true,
            RestartPlatform::Systemd => false,
        };

        if windows {
            RestartStrategy::ServiceControl {
                service: config.service.clone(),
                wait: config.windows_wait(),
            }
        } else {
            RestartStrategy::Systemd {
                service: config.service.clone(),
                use_sudo: config.use_sudo,
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RestartStrategy::Systemd { .. } => "systemd",
            RestartStrategy::ServiceControl { .. } => "windows",
        }
    }

    pub fn service(&self) -> &str {
        match self {
            RestartStrategy::Systemd { service, .. }
            | RestartStrategy::ServiceControl { service, .. } => service,
        }
    }

    /// Commands issued by [`restart`](Self::restart), in order.
    pub fn commands(&self) -> Vec<ServiceCommand> {
        match self {
            RestartStrategy::Systemd { service, use_sudo } => {
                let cmd = if *use_sudo {
                    ServiceCommand::new("sudo", ["systemctl", "restart", service.as_str()])
                } else {
                    ServiceCommand::new("systemctl", ["restart", service.as_str()])
                };
                vec![cmd]
            }
            RestartStrategy::ServiceControl { service, .. } => vec![
                ServiceCommand::new("sc", ["stop", service.as_str()]),
                ServiceCommand::new("sc", ["start", service.as_str()]),
            ],
        }
    }

    /// Issue the restart sequence.
    ///
    /// Fire and forget: failures and non-zero exits are logged, and the
    /// Windows sequence still issues `start` when `stop` failed.
    pub async fn restart(&self, runner: &dyn CommandRunner) {
        let pause = match self {
            RestartStrategy::Systemd { .. } => None,
            RestartStrategy::ServiceControl { wait, .. } => Some(*wait),
        };

        for (i, cmd) in self.commands().iter().enumerate() {
            if i > 0 {
                if let Some(wait) = pause {
                    tokio::time::sleep(wait).await;
                }
            }
            issue(runner, cmd).await;
        }
    }
}

async fn issue(runner: &dyn CommandRunner, command: &ServiceCommand) {
    warn!(%command, "issuing restart command");
    match runner.run(command).await {
        Ok(Some(0)) | Ok(None) => {}
        Ok(Some(code)) => warn!(%command, code, "restart command exited non-zero"),
        Err(e) => warn!(%command, error = %e, "restart command failed"),
    }
}
