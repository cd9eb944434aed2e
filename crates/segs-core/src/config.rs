//! Watchdog configuration parser.
//!
//! Every field has a default matching the stock SEGS deployment, so an
//! empty file (or no file at all) probes `blue:2106` and `blue:6001` and
//! restarts the `segs` service.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default host running the SEGS server.
pub const DEFAULT_HOST: &str = "blue";
/// Default authentication port.
pub const DEFAULT_AUTH_PORT: u16 = 2106;
/// Default JSON-RPC port.
pub const DEFAULT_RPC_PORT: u16 = 6001;
/// Default connect/write/read timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;
/// Default upper bound for the single response read.
pub const DEFAULT_READ_LIMIT: usize = 1024;
/// Largest accepted `read_limit`. The read buffer is allocated up front.
pub const MAX_READ_LIMIT: usize = 64 * 1024;
/// Bare JSON-RPC ping written to the RPC port. Sent as-is, no framing.
pub const DEFAULT_RPC_PAYLOAD: &str = r#"{"jsonrpc": "2.0", "method": "ping", "id": 1}"#;
/// Default name of the service to restart.
pub const DEFAULT_SERVICE: &str = "segs";
/// Default pause between `sc stop` and `sc start` on Windows, in seconds.
pub const DEFAULT_WINDOWS_WAIT_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Host both probes connect to.
    pub host: String,
    /// Timeout applied to each connect, write and read.
    pub timeout_secs: u64,
    /// Maximum number of bytes read from a probed socket.
    pub read_limit: usize,
    pub auth: AuthProbeConfig,
    pub rpc: RpcProbeConfig,
    pub restart: RestartConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthProbeConfig {
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcProbeConfig {
    pub port: u16,
    /// Raw text written after connecting. Empty means nothing is sent.
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    pub service: String,
    pub platform: RestartPlatform,
    /// Prefix `systemctl` with `sudo`.
    pub use_sudo: bool,
    pub windows_wait_secs: u64,
}

/// Which restart sequence to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestartPlatform {
    /// Pick from the platform the binary was built for.
    #[default]
    Auto,
    Systemd,
    Windows,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            read_limit: DEFAULT_READ_LIMIT,
            auth: AuthProbeConfig::default(),
            rpc: RpcProbeConfig::default(),
            restart: RestartConfig::default(),
        }
    }
}

impl Default for AuthProbeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_AUTH_PORT,
        }
    }
}

impl Default for RpcProbeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_RPC_PORT,
            payload: DEFAULT_RPC_PAYLOAD.to_string(),
        }
    }
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            platform: RestartPlatform::Auto,
            use_sudo: true,
            windows_wait_secs: DEFAULT_WINDOWS_WAIT_SECS,
        }
    }
}

impl WatchdogConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: WatchdogConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".into()));
        }
        if self.auth.port == 0 {
            return Err(ConfigError::Invalid("auth.port must not be 0".into()));
        }
        if self.rpc.port == 0 {
            return Err(ConfigError::Invalid("rpc.port must not be 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        if self.read_limit == 0 {
            return Err(ConfigError::Invalid("read_limit must be at least 1".into()));
        }
        if self.read_limit > MAX_READ_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "read_limit must be at most {MAX_READ_LIMIT}"
            )));
        }
        if self.restart.service.trim().is_empty() {
            return Err(ConfigError::Invalid("restart.service must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RestartConfig {
    pub fn windows_wait(&self) -> Duration {
        Duration::from_secs(self.windows_wait_secs)
    }
}
