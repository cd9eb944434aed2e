//! End-to-end watchdog passes against local TCP servers.
//!
//! Each test stands up real listeners on 127.0.0.1 and drives the
//! watchdog with a recording runner in place of `systemctl`/`sc`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use segs_core::{RestartPlatform, WatchdogConfig};
use segs_restart::{CommandRunner, RunFuture, ServiceCommand};
use segs_watchdog::Watchdog;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone, Default)]
struct RecordingRunner {
    issued: Arc<Mutex<Vec<String>>>,
}

impl RecordingRunner {
    fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(&'a self, command: &'a ServiceCommand) -> RunFuture<'a> {
        Box::pin(async move {
            self.issued.lock().unwrap().push(command.to_string());
            Ok(Some(0))
        })
    }
}

/// Accepts one connection and replies with `reply`. Returns the port and
/// whatever the client sent before the reply.
async fn replying_server(
    reply: &'static [u8],
    expect_request: bool,
) -> (u16, oneshot::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        if expect_request {
            let mut buf = [0u8; 1024];
            let n = sock.read(&mut buf).await.unwrap();
            received.extend_from_slice(&buf[..n]);
        }
        sock.write_all(reply).await.unwrap();
        let _ = tx.send(received);
    });

    (port, rx)
}

async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

fn local_config(auth_port: u16, rpc_port: u16, platform: RestartPlatform) -> WatchdogConfig {
    let mut config = WatchdogConfig::default();
    config.host = "127.0.0.1".to_string();
    config.timeout_secs = 1;
    config.auth.port = auth_port;
    config.rpc.port = rpc_port;
    config.restart.platform = platform;
    config
}

#[tokio::test]
async fn auth_down_rpc_pong_triggers_restart() {
    let auth_port = closed_port().await;
    let (rpc_port, _) = replying_server(b"pong", true).await;
    let runner = RecordingRunner::default();

    let config = local_config(auth_port, rpc_port, RestartPlatform::Systemd);
    let watchdog = Watchdog::from_config(&config, Box::new(runner.clone()));
    let run = watchdog.run_once().await;

    assert!(!run.report.auth.is_alive());
    assert_eq!(run.report.rpc.response(), Some(&b"pong"[..]));
    assert!(run.restarted);
    assert_eq!(runner.issued(), ["sudo systemctl restart segs"]);
}

#[tokio::test]
async fn both_ports_replying_means_no_restart() {
    let (auth_port, _) = replying_server(b"\x00", false).await;
    let (rpc_port, _) = replying_server(b"\x00", false).await;
    let runner = RecordingRunner::default();

    let config = local_config(auth_port, rpc_port, RestartPlatform::Systemd);
    let run = Watchdog::from_config(&config, Box::new(runner.clone()))
        .run_once()
        .await;

    assert!(run.report.auth.is_alive());
    assert!(run.report.rpc.is_alive());
    assert!(!run.restarted);
    assert!(runner.issued().is_empty());
}

#[tokio::test]
async fn rpc_probe_sends_raw_ping() {
    let (auth_port, _) = replying_server(b"hello", false).await;
    let (rpc_port, received) = replying_server(b"{}", true).await;

    let config = local_config(auth_port, rpc_port, RestartPlatform::Systemd);
    let run = Watchdog::from_config(&config, Box::new(RecordingRunner::default()))
        .run_once()
        .await;

    assert!(!run.restarted);
    assert_eq!(
        received.await.unwrap(),
        br#"{"jsonrpc": "2.0", "method": "ping", "id": 1}"#
    );
}

#[tokio::test]
async fn rpc_probe_runs_after_auth_failure() {
    let auth_port = closed_port().await;
    let (rpc_port, received) = replying_server(b"ok", true).await;

    let config = local_config(auth_port, rpc_port, RestartPlatform::Systemd);
    let run = Watchdog::from_config(&config, Box::new(RecordingRunner::default()))
        .run_once()
        .await;

    assert!(run.restarted);
    assert!(!received.await.unwrap().is_empty());
}

#[tokio::test]
async fn silent_rpc_server_times_out_and_restarts() {
    let (auth_port, _) = replying_server(b"a", false).await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let rpc_port = listener.local_addr().unwrap().port();
    let (release_tx, release_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let (_sock, _) = listener.accept().await.unwrap();
        let _ = release_rx.await;
    });
    let runner = RecordingRunner::default();

    let config = local_config(auth_port, rpc_port, RestartPlatform::Systemd);
    let run = Watchdog::from_config(&config, Box::new(runner.clone()))
        .run_once()
        .await;

    assert_eq!(run.report.rpc, segs_health::ProbeResult::Timeout);
    assert!(run.restarted);
    assert_eq!(runner.issued().len(), 1);
    let _ = release_tx.send(());
}

#[tokio::test]
async fn windows_strategy_issues_stop_then_start() {
    let auth_port = closed_port().await;
    let rpc_port = closed_port().await;
    let runner = RecordingRunner::default();

    let mut config = local_config(auth_port, rpc_port, RestartPlatform::Windows);
    config.restart.windows_wait_secs = 0;
    let watchdog = Watchdog::from_config(&config, Box::new(runner.clone()));
    assert_eq!(watchdog.strategy().name(), "windows");

    let run = tokio::time::timeout(Duration::from_secs(10), watchdog.run_once())
        .await
        .unwrap();

    assert!(run.restarted);
    assert_eq!(runner.issued(), ["sc stop segs", "sc start segs"]);
}
