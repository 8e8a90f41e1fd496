//! Console overlay state
//!
//! Collects the output of one console invocation, keeps the accumulated text
//! for classification and decides how the user may leave once it finished.

use regex::Regex;
use std::collections::VecDeque;
use std::sync::LazyLock;

use crate::commands::outcome::{Affordance, CommandOutcome, OutcomeClassifier, OutputBuffer};
use crate::commands::{CommandEvent, CommandInvocation, InvocationId};
use crate::constants::{CONSOLE_BUFFER_SIZE, UNREAPED_EXIT_CODE};
use crate::i18n::{Language, Text};

/// Regex to match ANSI escape codes.
static ANSI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[a-zA-Z]").expect("valid ANSI regex"));

/// Strip ANSI escape codes from a string
pub fn strip_ansi_codes(s: &str) -> String {
    ANSI_RE.replace_all(s, "").to_string()
}

#[derive(Debug)]
pub struct ConsoleState {
    pub title: String,
    /// Raw command as requested, used to pick the view to refresh
    pub command: String,
    pub requires_reboot: bool,
    /// None = follow the tail, Some(n) = manual scroll at line n
    pub scroll_offset: Option<usize>,
    lines: VecDeque<String>,
    buffer: OutputBuffer,
    invocation_id: Option<InvocationId>,
    outcome: Option<CommandOutcome>,
}

impl ConsoleState {
    pub fn new(invocation: &CommandInvocation, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: invocation.command.clone(),
            requires_reboot: invocation.requires_reboot,
            scroll_offset: None,
            lines: VecDeque::new(),
            buffer: OutputBuffer::new(),
            invocation_id: None,
            outcome: None,
        }
    }

    /// Bind the console to the invocation the supervisor spawned
    pub fn attach(&mut self, id: InvocationId) {
        self.invocation_id = Some(id);
    }

    /// Events of other (stale) invocations are ignored
    pub fn accepts(&self, event: &CommandEvent) -> bool {
        self.invocation_id == Some(event.id())
    }

    pub fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<&CommandOutcome> {
        self.outcome.as_ref()
    }

    /// None while the command is still running
    pub fn affordance(&self) -> Option<Affordance> {
        self.outcome.as_ref().map(CommandOutcome::affordance)
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > CONSOLE_BUFFER_SIZE {
            self.lines.pop_front();
        }
    }

    fn push_lines(&mut self, text: &str) -> Vec<String> {
        let clean = strip_ansi_codes(text);
        let added: Vec<String> = clean.split('\n').map(str::to_string).collect();
        for line in &added {
            self.push_line(line.clone());
        }
        added
    }

    /// New invocation: accumulated output starts over
    pub fn on_started(&mut self, command_line: &str) -> Vec<String> {
        self.buffer.clear();
        self.push_lines(&format!("$ {}", command_line))
    }

    pub fn on_output(&mut self, text: &str) -> Vec<String> {
        self.buffer.push(text);
        self.push_lines(text)
    }

    pub fn on_finished(
        &mut self,
        exit_code: i32,
        classifier: &OutcomeClassifier,
        lang: Language,
    ) -> Vec<String> {
        let outcome = classifier.classify(exit_code, self.buffer.as_str(), self.requires_reboot);
        self.finish(outcome, lang)
    }

    /// The command never started; the message is the only output
    pub fn on_launch_failed(
        &mut self,
        message: &str,
        classifier: &OutcomeClassifier,
        lang: Language,
    ) -> Vec<String> {
        let mut added = self.push_lines(message);
        self.buffer.push(message);
        let outcome = classifier.classify(UNREAPED_EXIT_CODE, self.buffer.as_str(), false);
        added.extend(self.finish(outcome, lang));
        added
    }

    /// Reboot-now was chosen
    pub fn on_reboot_started(&mut self, lang: Language) -> Vec<String> {
        self.push_lines(lang.tr(Text::RebootStarting))
    }

    /// The reboot command itself failed; leave the console closable
    pub fn on_reboot_failed(&mut self, output: &str, lang: Language) -> Vec<String> {
        let mut added = Vec::new();
        if !output.trim().is_empty() {
            added.extend(self.push_lines(output.trim_end()));
        }
        added.extend(self.push_lines(&lang.fmt(Text::LaunchError, "systemctl reboot")));
        if let Some(outcome) = self.outcome.as_mut() {
            outcome.requires_reboot = false;
        }
        added
    }

    fn finish(&mut self, outcome: CommandOutcome, lang: Language) -> Vec<String> {
        let mut added = Vec::new();
        for line in outcome.summary(lang) {
            added.extend(self.push_lines(&line));
        }
        self.outcome = Some(outcome);
        added
    }

    pub fn scroll_up(&mut self, amount: usize) {
        let current = self
            .scroll_offset
            .unwrap_or_else(|| self.lines.len().saturating_sub(1));
        self.scroll_offset = Some(current.saturating_sub(amount));
    }

    pub fn scroll_down(&mut self, amount: usize) {
        if let Some(offset) = self.scroll_offset {
            let next = offset + amount;
            self.scroll_offset = if next >= self.lines.len().saturating_sub(1) {
                None
            } else {
                Some(next)
            };
        }
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_offset = None;
    }
}
