//! Errors raised while launching or waiting for commands
//!
//! Authorization failures, non-zero exits and cancellations are not errors:
//! they are outcomes (see `outcome.rs`).

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
}

pub type CommandResult<T> = Result<T, CommandError>;
