//! Auth + RPC liveness check and the restart decision.

use std::time::Duration;

use segs_core::WatchdogConfig;
use tracing::{debug, info, warn};

use crate::checker::{ProbeResult, ProbeTarget, check_connection};

/// Results of one auth probe and one RPC probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessReport {
    pub auth: ProbeResult,
    pub rpc: ProbeResult,
}

impl LivenessReport {
    /// True unless both probes received a response.
    pub fn needs_restart(&self) -> bool {
        !self.auth.is_alive() || !self.rpc.is_alive()
    }
}

/// Probes the auth and RPC ports of one SEGS host.
#[derive(Debug, Clone)]
pub struct LivenessChecker {
    auth: ProbeTarget,
    rpc: ProbeTarget,
    timeout: Duration,
    read_limit: usize,
}

impl LivenessChecker {
    pub fn new(auth: ProbeTarget, rpc: ProbeTarget, timeout: Duration, read_limit: usize) -> Self {
        Self {
            auth,
            rpc,
            timeout,
            read_limit,
        }
    }

    /// Build both targets from the config: auth sends nothing, RPC sends
    /// the configured ping payload.
    pub fn from_config(config: &WatchdogConfig) -> Self {
        let auth = ProbeTarget::new(config.host.clone(), config.auth.port);
        let mut rpc = ProbeTarget::new(config.host.clone(), config.rpc.port);
        if !config.rpc.payload.is_empty() {
            rpc = rpc.with_payload(config.rpc.payload.as_bytes());
        }
        Self::new(auth, rpc, config.timeout(), config.read_limit)
    }

    pub fn auth_target(&self) -> &ProbeTarget {
        &self.auth
    }

    pub fn rpc_target(&self) -> &ProbeTarget {
        &self.rpc
    }

    /// Run the auth probe, then the RPC probe.
    ///
    /// The RPC probe runs even when the auth probe already failed.
    pub async fn check(&self) -> LivenessReport {
        debug!(address = %self.auth.address(), "probing auth port");
        let auth = check_connection(&self.auth, self.timeout, self.read_limit).await;

        debug!(address = %self.rpc.address(), "probing rpc port");
        let rpc = check_connection(&self.rpc, self.timeout, self.read_limit).await;

        let report = LivenessReport { auth, rpc };
        if report.needs_restart() {
            warn!(
                auth = %report.auth,
                rpc = %report.rpc,
                "server unresponsive"
            );
        } else {
            info!(
                auth_bytes = report.auth.response().map_or(0, <[u8]>::len),
                rpc_bytes = report.rpc.response().map_or(0, <[u8]>::len),
                "server responsive"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn alive() -> ProbeResult {
        ProbeResult::Response(b"+".to_vec())
    }

    #[test]
    fn restart_decision_over_all_combinations() {
        let cases = [
            (alive(), alive(), false),
            (alive(), ProbeResult::Timeout, true),
            (ProbeResult::Refused, alive(), true),
            (
                ProbeResult::Io {
                    kind: io::ErrorKind::ConnectionReset,
                    message: "reset".into(),
                },
                ProbeResult::Timeout,
                true,
            ),
        ];

        for (auth, rpc, expected) in cases {
            let report = LivenessReport { auth, rpc };
            assert_eq!(report.needs_restart(), expected, "{report:?}");
        }
    }

    #[test]
    fn empty_response_counts_as_down() {
        let report = LivenessReport {
            auth: alive(),
            rpc: ProbeResult::Response(Vec::new()),
        };
        assert!(report.needs_restart());
    }

    #[test]
    fn from_config_builds_targets() {
        let config = WatchdogConfig::default();
        let checker = LivenessChecker::from_config(&config);

        assert_eq!(checker.auth_target().address(), "blue:2106");
        assert!(checker.auth_target().payload.is_none());

        assert_eq!(checker.rpc_target().address(), "blue:6001");
        assert_eq!(
            checker.rpc_target().payload.as_deref(),
            Some(&b"{\"jsonrpc\": \"2.0\", \"method\": \"ping\", \"id\": 1}"[..])
        );
    }

    #[test]
    fn empty_rpc_payload_sends_nothing() {
        let mut config = WatchdogConfig::default();
        config.rpc.payload.clear();
        let checker = LivenessChecker::from_config(&config);
        assert!(checker.rpc_target().payload.is_none());
    }
}
