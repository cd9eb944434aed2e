//! Restart error types.

use thiserror::Error;

/// Errors that can occur while issuing a restart command.
#[derive(Debug, Error)]
pub enum RestartError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

pub type RestartResult<T> = Result<T, RestartError>;
