//! Console output accumulation and outcome classification
//!
//! Authorization failures are detected heuristically by phrase matching on
//! the accumulated output; pkexec does not report them through a distinct
//! exit code contract we can rely on.

use crate::constants::CANCEL_MARKER;
use crate::i18n::{Language, Text};

/// Authorization-failure phrases from pkexec, polkit agents and sudo-style
/// prompts, in English and Spanish. Matched case-insensitively.
const AUTH_FAILURE_PHRASES: &[&str] = &[
    "request dismissed",
    "authentication failed",
    "not authorized",
    "no authentication agent found",
    "error executing command as another user",
    "incorrect password",
    "sorry, try again",
    "solicitud descartada",
    "autenticación fallida",
    "fallo de autenticación",
    "no autorizado",
    "contraseña incorrecta",
    "error al ejecutar el comando como otro usuario",
];

/// Accumulated output of the current invocation
#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one output notification, newline-joined
    pub fn push(&mut self, chunk: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(chunk);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Classifies finished invocations
#[derive(Debug, Clone)]
pub struct OutcomeClassifier {
    phrases: Vec<String>,
}

impl Default for OutcomeClassifier {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

impl OutcomeClassifier {
    /// Built-in phrases plus `extra` (e.g. from the user settings)
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases: Vec<String> = AUTH_FAILURE_PHRASES.iter().map(|p| p.to_string()).collect();
        for phrase in extra {
            let phrase = phrase.as_ref().trim().to_lowercase();
            if !phrase.is_empty() && !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
        Self { phrases }
    }

    pub fn is_permission_failure(&self, output: &str) -> bool {
        let lower = output.to_lowercase();
        self.phrases.iter().any(|p| lower.contains(p.as_str()))
    }

    pub fn classify(&self, exit_code: i32, output: &str, requires_reboot: bool) -> CommandOutcome {
        CommandOutcome {
            exit_code,
            output: output.to_string(),
            permission_failure: self.is_permission_failure(output),
            user_cancelled: output.contains(CANCEL_MARKER),
            requires_reboot,
        }
    }
}

/// Terminal result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: i32,
    pub output: String,
    pub permission_failure: bool,
    pub user_cancelled: bool,
    pub requires_reboot: bool,
}

/// What the user is told happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Cancelled,
    PermissionDenied { exit_code: i32 },
    Failed { exit_code: i32 },
}

/// How the console lets the user leave once the command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Close,
    RebootPrompt,
}

impl CommandOutcome {
    pub fn is_successful(&self) -> bool {
        self.exit_code == 0 && !self.permission_failure && !self.user_cancelled
    }

    pub fn kind(&self) -> OutcomeKind {
        if self.user_cancelled {
            OutcomeKind::Cancelled
        } else if self.is_successful() {
            OutcomeKind::Success
        } else if self.permission_failure {
            OutcomeKind::PermissionDenied {
                exit_code: self.exit_code,
            }
        } else {
            OutcomeKind::Failed {
                exit_code: self.exit_code,
            }
        }
    }

    pub fn affordance(&self) -> Affordance {
        if self.is_successful() && self.requires_reboot {
            Affordance::RebootPrompt
        } else {
            Affordance::Close
        }
    }

    /// Lines appended to the console once the command finished
    pub fn summary(&self, lang: Language) -> Vec<String> {
        let mut lines = match self.kind() {
            OutcomeKind::Success => vec![lang.tr(Text::OutcomeSuccess).to_string()],
            OutcomeKind::Cancelled => vec![lang.tr(Text::OutcomeCancelled).to_string()],
            OutcomeKind::PermissionDenied { exit_code } => vec![
                lang.fmt(Text::OutcomePermissionDenied, exit_code),
                lang.tr(Text::PermissionHint).to_string(),
            ],
            OutcomeKind::Failed { exit_code } => vec![lang.fmt(Text::OutcomeFailed, exit_code)],
        };

        if self.affordance() == Affordance::RebootPrompt {
            lines.push(lang.tr(Text::RebootRequired).to_string());
        }
        lines
    }
}
