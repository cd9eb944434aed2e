//! External process execution for restart commands.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{RestartError, RestartResult};

/// A program plus its arguments, e.g. `sc stop segs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ServiceCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ServiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Boxed future returned by [`CommandRunner::run`].
///
/// Resolves to the exit code, or `None` when the process ended without
/// one (killed by a signal, or not actually executed).
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = RestartResult<Option<i32>>> + Send + 'a>>;

/// Executes restart commands — injected so strategies can be tested.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(&'a self, command: &'a ServiceCommand) -> RunFuture<'a>;
}

/// Spawns the command as a child process and waits for it to exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run<'a>(&'a self, command: &'a ServiceCommand) -> RunFuture<'a> {
        Box::pin(async move {
            debug!(%command, "spawning");
            let mut child = Command::new(&command.program)
                .args(&command.args)
                .stdin(Stdio::null())
                .spawn()
                .map_err(|source| RestartError::Spawn {
                    command: command.to_string(),
                    source,
                })?;

            let status = child.wait().await.map_err(|source| RestartError::Wait {
                command: command.to_string(),
                source,
            })?;
            Ok(status.code())
        })
    }
}

/// Logs each command instead of running it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run<'a>(&'a self, command: &'a ServiceCommand) -> RunFuture<'a> {
        Box::pin(async move {
            info!(%command, "dry run, not executing");
            Ok(None)
        })
    }
}
