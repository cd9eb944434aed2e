//! Single TCP probe.
//!
//! Connects, optionally writes a payload, and performs one bounded read.
//! Each phase is guarded by the same timeout.

use std::fmt;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Where a probe connects and what it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: u16,
    /// Written once after connecting. `None` or empty sends nothing.
    pub payload: Option<Vec<u8>>,
}

impl ProbeTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// `host:port`, for logging.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The peer sent at least one byte. A partial read still counts.
    Response(Vec<u8>),
    /// Connect, write or read did not finish within the timeout.
    Timeout,
    /// The connection was actively refused.
    Refused,
    /// Any other failure: resolution, reset, write error, or the peer
    /// closing before sending anything.
    Io { kind: io::ErrorKind, message: String },
}

impl ProbeResult {
    /// Whether the probe received a non-empty response.
    pub fn is_alive(&self) -> bool {
        matches!(self, ProbeResult::Response(bytes) if !bytes.is_empty())
    }

    /// The received bytes, if any.
    pub fn response(&self) -> Option<&[u8]> {
        match self {
            ProbeResult::Response(bytes) if !bytes.is_empty() => Some(bytes),
            _ => None,
        }
    }

    /// Short machine-friendly label for the outcome.
    pub fn label(&self) -> &'static str {
        match self {
            ProbeResult::Response(_) => "response",
            ProbeResult::Timeout => "timeout",
            ProbeResult::Refused => "refused",
            ProbeResult::Io { .. } => "io-error",
        }
    }

    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => ProbeResult::Refused,
            io::ErrorKind::TimedOut => ProbeResult::Timeout,
            kind => ProbeResult::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeResult::Response(bytes) => write!(f, "response ({} bytes)", bytes.len()),
            ProbeResult::Timeout => f.write_str("timed out"),
            ProbeResult::Refused => f.write_str("connection refused"),
            ProbeResult::Io { message, .. } => write!(f, "i/o error: {message}"),
        }
    }
}

/// Probe `target`: connect, write the payload if any, read once.
///
/// Reads at most `read_limit` bytes in a single call; it does not loop
/// until EOF. Never returns an error, failures are encoded in the result.
pub async fn check_connection(
    target: &ProbeTarget,
    timeout: Duration,
    read_limit: usize,
) -> ProbeResult {
    let address = target.address();

    let connect = TcpStream::connect((target.host.as_str(), target.port));
    let mut stream = match tokio::time::timeout(timeout, connect).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => {
            debug!(error = %e, %address, "probe connect failed");
            return ProbeResult::from_io(&e);
        }
        Err(_) => {
            debug!(%address, "probe connect timed out");
            return ProbeResult::Timeout;
        }
    };

    if let Some(payload) = target.payload.as_deref().filter(|p| !p.is_empty()) {
        match tokio::time::timeout(timeout, stream.write_all(payload)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!(error = %e, %address, "probe write failed");
                return ProbeResult::from_io(&e);
            }
            Err(_) => {
                debug!(%address, "probe write timed out");
                return ProbeResult::Timeout;
            }
        }
    }

    let mut buf = vec![0u8; read_limit];
    match tokio::time::timeout(timeout, stream.read(&mut buf)).await {
        Ok(Ok(0)) => {
            debug!(%address, "probe peer closed without responding");
            ProbeResult::Io {
                kind: io::ErrorKind::UnexpectedEof,
                message: "connection closed before any response".to_string(),
            }
        }
        Ok(Ok(n)) => {
            buf.truncate(n);
            debug!(%address, bytes = n, "probe received response");
            ProbeResult::Response(buf)
        }
        Ok(Err(e)) => {
            debug!(error = %e, %address, "probe read failed");
            ProbeResult::from_io(&e)
        }
        Err(_) => {
            debug!(%address, "probe read timed out");
            ProbeResult::Timeout
        }
    }
}
