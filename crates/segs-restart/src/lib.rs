//! segs-restart — restart sequences for the SEGS service.
//!
//! A [`RestartStrategy`] is chosen once at startup from the config and the
//! build platform:
//!
//! ```text
//! Systemd         sudo systemctl restart <service>
//! ServiceControl  sc stop <service> → sleep(wait) → sc start <service>
//! ```
//!
//! Commands go through a [`CommandRunner`] so each sequence can be driven
//! against a recording fake. Exit codes and spawn failures are logged and
//! otherwise ignored; no restart is ever confirmed.

pub mod error;
pub mod runner;
pub mod strategy;

pub use error::{RestartError, RestartResult};
pub use runner::{CommandRunner, DryRunRunner, RunFuture, ServiceCommand, ShellRunner};
pub use strategy::RestartStrategy;
