//! Command execution module
//!
//! - `elevation.rs` - decides which commands run through pkexec
//! - `supervisor.rs` - runs one console command at a time and streams its output
//! - `outcome.rs` - accumulates console output and classifies the result
//! - `immutable.rs` - command lines and output parsers for the deepin immutable CLIs

pub mod elevation;
pub mod errors;
pub mod immutable;
pub mod outcome;
pub mod supervisor;

use std::collections::HashMap;

/// Identifies one console invocation in the event stream
pub type InvocationId = u64;

/// Messages sent from the supervisor to the UI
///
/// For every invocation that was spawned the order is: one `Started`,
/// zero or more `Output`, exactly one `Finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    /// Final command line, sent before the process is spawned
    Started { id: InvocationId, command_line: String },
    /// A chunk of output (stderr chunks carry the `ERROR: ` prefix)
    Output { id: InvocationId, text: String },
    /// The process exited or was killed
    Finished { id: InvocationId, exit_code: i32 },
}

impl CommandEvent {
    pub fn id(&self) -> InvocationId {
        match self {
            CommandEvent::Started { id, .. }
            | CommandEvent::Output { id, .. }
            | CommandEvent::Finished { id, .. } => *id,
        }
    }
}

/// One command to run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: String,
    /// Stream into the console instead of capturing synchronously
    pub show_in_console: bool,
    /// Offer a reboot when the command succeeds
    pub requires_reboot: bool,
    /// Merged over the inherited environment
    pub env: HashMap<String, String>,
}

impl CommandInvocation {
    /// A console command
    pub fn console(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            show_in_console: true,
            ..Self::default()
        }
    }

    /// A synchronous query whose output is captured
    pub fn query(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            show_in_console: false,
            ..Self::default()
        }
    }

    pub fn with_reboot(mut self, requires_reboot: bool) -> Self {
        self.requires_reboot = requires_reboot;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builders() {
        let inv = CommandInvocation::console("deepin-immutable-ctl admin rollback")
            .with_reboot(true)
            .with_env("LANG", "C");
        assert!(inv.show_in_console);
        assert!(inv.requires_reboot);
        assert_eq!(inv.env.get("LANG").map(String::as_str), Some("C"));

        let query = CommandInvocation::query("deepin-immutable-ctl snapshot list");
        assert!(!query.show_in_console);
        assert!(!query.requires_reboot);
    }

    #[test]
    fn test_event_id() {
        let event = CommandEvent::Finished { id: 7, exit_code: 0 };
        assert_eq!(event.id(), 7);
    }
}
