//! `segs-watchdog check` — probe and report, never restart.

use std::process::ExitCode;

use segs_core::WatchdogConfig;
use segs_health::{LivenessChecker, LivenessReport, ProbeResult, ProbeTarget};
use serde_json::json;

pub async fn check(config: &WatchdogConfig, as_json: bool) -> anyhow::Result<ExitCode> {
    let checker = LivenessChecker::from_config(config);
    let report = checker.check().await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report_json(&checker, &report))?);
    } else {
        print!("{}", format_report(&checker, &report));
    }

    Ok(if report.needs_restart() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn probe_json(target: &ProbeTarget, result: &ProbeResult) -> serde_json::Value {
    json!({
        "address": target.address(),
        "alive": result.is_alive(),
        "outcome": result.label(),
        "detail": result.to_string(),
        "bytes": result.response().map_or(0, <[u8]>::len),
    })
}

fn report_json(checker: &LivenessChecker, report: &LivenessReport) -> serde_json::Value {
    json!({
        "auth": probe_json(checker.auth_target(), &report.auth),
        "rpc": probe_json(checker.rpc_target(), &report.rpc),
        "needs_restart": report.needs_restart(),
    })
}

fn format_report(checker: &LivenessChecker, report: &LivenessReport) -> String {
    let status = if report.needs_restart() {
        "DOWN (restart needed)"
    } else {
        "UP"
    };
    format!(
        "auth  {:<24} {}\nrpc   {:<24} {}\nstatus: {}\n",
        checker.auth_target().address(),
        report.auth,
        checker.rpc_target().address(),
        report.rpc,
        status,
    )
}
