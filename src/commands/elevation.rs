//! Privilege elevation policy
//!
//! Decides from the command text alone whether a command must run through
//! pkexec, and produces the final command line. No I/O.

use crate::constants::{ELEVATION_PREFIX, FORCE_ROOT_SIGNATURES, NO_ROOT_SIGNATURES};

/// Elevation prefix plus the signature lists it is matched against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationPolicy {
    prefix: String,
    no_root: Vec<String>,
    force_root: Vec<String>,
}

impl Default for ElevationPolicy {
    fn default() -> Self {
        Self::new(ELEVATION_PREFIX)
    }
}

impl ElevationPolicy {
    /// Policy with the built-in signature lists and a custom prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            no_root: NO_ROOT_SIGNATURES.iter().map(|s| s.to_string()).collect(),
            force_root: FORCE_ROOT_SIGNATURES.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn is_prefixed(&self, command: &str) -> bool {
        let trimmed = command.trim_start();
        trimmed == self.prefix || trimmed.starts_with(&format!("{} ", self.prefix))
    }

    fn forces_root(&self, command: &str) -> bool {
        self.force_root.iter().any(|sig| command.contains(sig.as_str()))
    }

    /// Whether the command runs with root privileges once dispatched
    pub fn requires_elevation(&self, command: &str) -> bool {
        if self.is_prefixed(command) || self.forces_root(command) {
            return true;
        }
        !self.no_root.iter().any(|sig| command.contains(sig.as_str()))
    }

    /// Final command line to hand to the shell
    ///
    /// Already-prefixed commands pass through unchanged, except force-root
    /// commands whose stray inner prefixes are stripped before the single
    /// leading prefix is applied.
    pub fn apply(&self, command: &str) -> String {
        if self.forces_root(command) {
            let inner_prefix = format!("{} ", self.prefix);
            let stripped = command.replace(&inner_prefix, "");
            return format!("{} {}", self.prefix, stripped.trim_start());
        }

        if self.is_prefixed(command) || !self.requires_elevation(command) {
            command.to_string()
        } else {
            format!("{} {}", self.prefix, command)
        }
    }
}
