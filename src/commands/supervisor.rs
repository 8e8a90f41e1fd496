//! Process supervisor
//!
//! Runs at most one console command at a time through the shell, streams its
//! stdout/stderr as `CommandEvent`s and reports completion exactly once.
//! Synchronous queries (status, snapshot list) are captured in place.

use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::elevation::ElevationPolicy;
use super::errors::{CommandError, CommandResult};
use super::outcome::{CommandOutcome, OutcomeClassifier};
use super::{CommandEvent, CommandInvocation, InvocationId};
use crate::constants::{
    self, CANCEL_MARKER, KILL_NOISE, OUTPUT_DRAIN_TIMEOUT, READ_CHUNK_SIZE, REAP_TIMEOUT,
    STDERR_PREFIX, UNREAPED_EXIT_CODE,
};
use crate::i18n::{Language, Text};

/// Result of dispatching an invocation
#[derive(Debug)]
pub enum Execution {
    /// Synchronous query finished
    Captured(CommandOutcome),
    /// Console command is running; events follow on the channel
    Spawned(InvocationId),
    /// Could not be launched; carries the localized message that was also
    /// sent as an `Output` event for console commands
    Failed(String),
}

/// Which pipe a chunk came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug)]
struct Chunk {
    stream: Stream,
    text: String,
}

/// The in-flight console process
#[derive(Debug)]
struct RunningProcess {
    id: InvocationId,
    command_line: String,
    pid: Option<u32>,
    cancel_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

pub struct ProcessSupervisor {
    events: mpsc::UnboundedSender<CommandEvent>,
    policy: ElevationPolicy,
    classifier: OutcomeClassifier,
    shell: String,
    lang: Language,
    query_timeout: Duration,
    current: Option<RunningProcess>,
    next_id: InvocationId,
}

impl ProcessSupervisor {
    pub fn new(events: mpsc::UnboundedSender<CommandEvent>) -> Self {
        Self {
            events,
            policy: ElevationPolicy::default(),
            classifier: OutcomeClassifier::default(),
            shell: constants::SHELL.to_string(),
            lang: Language::default(),
            query_timeout: Duration::from_secs(constants::DEFAULT_QUERY_TIMEOUT_SECS),
            current: None,
            next_id: 1,
        }
    }

    pub fn with_policy(mut self, policy: ElevationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_classifier(mut self, classifier: OutcomeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_language(mut self, lang: Language) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn set_language(&mut self, lang: Language) {
        self.lang = lang;
    }

    pub fn classifier(&self) -> &OutcomeClassifier {
        &self.classifier
    }

    /// True while a console process has not exited yet
    pub fn is_running(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    /// Drop the handle once its `Finished` event has been consumed
    pub fn release(&mut self, id: InvocationId) {
        if self.current.as_ref().is_some_and(|r| r.id == id) {
            tracing::debug!("Releasing invocation {}", id);
            self.current = None;
        }
    }

    /// Dispatch an invocation to the console or the synchronous path
    pub async fn execute(&mut self, invocation: &CommandInvocation) -> Execution {
        if !invocation.show_in_console {
            return match self.query(invocation).await {
                Ok(outcome) => Execution::Captured(outcome),
                Err(e) => {
                    tracing::error!("Query failed: {}", e);
                    Execution::Failed(self.lang.fmt(Text::LaunchError, e))
                }
            };
        }

        let command_line = self.policy.apply(&invocation.command);
        let id = self.next_id;
        self.next_id += 1;

        self.emit(CommandEvent::Started {
            id,
            command_line: command_line.clone(),
        });

        match self.spawn(&command_line, &invocation.env) {
            Ok(mut child) => {
                let pid = child.id();
                tracing::info!("Running command #{} (pid {:?}): {}", id, pid, command_line);

                let (cancel_tx, cancel_rx) = mpsc::channel(1);
                let readers = spawn_readers(&mut child);
                let task = tokio::spawn(supervise(
                    id,
                    command_line.clone(),
                    child,
                    readers,
                    self.events.clone(),
                    cancel_rx,
                ));

                if let Some(previous) = self.current.take() {
                    if !previous.task.is_finished() {
                        tracing::warn!(
                            "Starting #{} while #{} ({}) is still running",
                            id,
                            previous.id,
                            previous.command_line
                        );
                    }
                }

                self.current = Some(RunningProcess {
                    id,
                    command_line,
                    pid,
                    cancel_tx,
                    task,
                });
                Execution::Spawned(id)
            }
            Err(e) => {
                tracing::error!("Failed to launch command #{}: {}", id, e);
                let message = self.lang.fmt(Text::LaunchError, &e);
                self.emit(CommandEvent::Output {
                    id,
                    text: message.clone(),
                });
                Execution::Failed(message)
            }
        }
    }

    /// Run a command to completion and capture its output
    ///
    /// stderr, when present, is appended after an `ERROR:` marker.
    pub async fn query(&self, invocation: &CommandInvocation) -> CommandResult<CommandOutcome> {
        let command_line = self.policy.apply(&invocation.command);
        tracing::info!("Capturing command: {}", command_line);

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&command_line)
            .envs(&invocation.env)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.query_timeout, output)
            .await
            .map_err(|_| CommandError::Timeout {
                command: command_line.clone(),
                secs: self.query_timeout.as_secs(),
            })?
            .map_err(|source| CommandError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            text.push_str("\n\nERROR:\n");
            text.push_str(&stderr);
        }

        let exit_code = exit_code(output.status);
        tracing::debug!("Captured command exited with {}", exit_code);
        Ok(self
            .classifier
            .classify(exit_code, &text, invocation.requires_reboot))
    }

    /// Kill the console process, if any
    ///
    /// Returns false (and sends nothing) when no process is running.
    pub async fn cancel(&mut self) -> bool {
        let Some(running) = self.current.take() else {
            return false;
        };

        if running.task.is_finished() {
            tracing::debug!("Cancel requested for finished invocation #{}", running.id);
            return false;
        }

        tracing::info!(
            "Cancelling command #{} (pid {:?}): {}",
            running.id,
            running.pid,
            running.command_line
        );

        if running.cancel_tx.try_send(()).is_err() {
            tracing::debug!("Invocation #{} finished before the cancel arrived", running.id);
            return false;
        }

        // The supervising task bounds its own reap wait; leave some slack for it
        match tokio::time::timeout(REAP_TIMEOUT * 2, running.task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Supervisor task for #{} failed: {}", running.id, e),
            Err(_) => tracing::warn!("Supervisor task for #{} did not stop in time", running.id),
        }
        true
    }

    fn spawn(&self, command_line: &str, env: &HashMap<String, String>) -> CommandResult<Child> {
        Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                command: command_line.to_string(),
                source,
            })
    }

    fn emit(&self, event: CommandEvent) {
        // Receiver gone means the UI is shutting down
        if let Err(e) = self.events.send(event) {
            tracing::debug!("Dropping command event: {:?}", e.0);
        }
    }
}

/// Pipe readers feeding one chunk channel
struct Readers {
    handles: Vec<JoinHandle<()>>,
    chunks: mpsc::UnboundedReceiver<Chunk>,
}

impl Readers {
    fn detach(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
        self.chunks.close();
    }
}

fn spawn_readers(child: &mut Child) -> Readers {
    let (tx, chunks) = mpsc::unbounded_channel();
    let mut handles = Vec::with_capacity(2);

    if let Some(stdout) = child.stdout.take() {
        handles.push(spawn_reader(stdout, Stream::Stdout, tx.clone()));
    }
    if let Some(stderr) = child.stderr.take() {
        handles.push(spawn_reader(stderr, Stream::Stderr, tx));
    }

    Readers { handles, chunks }
}

fn spawn_reader<R>(mut pipe: R, stream: Stream, tx: mpsc::UnboundedSender<Chunk>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = [0u8; READ_CHUNK_SIZE];
        let mut pending = Vec::new();
        loop {
            match pipe.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    pending.extend_from_slice(&buf[..n]);
                    let text = take_decodable(&mut pending);
                    if !forward(&tx, stream, &text) {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to read {:?}: {}", stream, e);
                    break;
                }
            }
        }
        if !pending.is_empty() {
            forward(&tx, stream, &String::from_utf8_lossy(&pending));
        }
    })
}

/// Decode what is complete in `pending`, keeping a trailing partial UTF-8
/// sequence for the next read
fn take_decodable(pending: &mut Vec<u8>) -> String {
    let cut = match std::str::from_utf8(pending) {
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        _ => pending.len(),
    };
    let tail = pending.split_off(cut);
    let text = String::from_utf8_lossy(pending).into_owned();
    *pending = tail;
    text
}

/// Send one chunk without its surrounding line breaks; false once the
/// receiver is gone
fn forward(tx: &mpsc::UnboundedSender<Chunk>, stream: Stream, text: &str) -> bool {
    let text = text.trim_matches(['\n', '\r']);
    if text.is_empty() {
        return true;
    }
    tx.send(Chunk {
        stream,
        text: text.to_string(),
    })
    .is_ok()
}

/// Owns the child for its whole life; the only producer of events after `Started`
async fn supervise(
    id: InvocationId,
    command_line: String,
    mut child: Child,
    mut readers: Readers,
    events: mpsc::UnboundedSender<CommandEvent>,
    mut cancel_rx: mpsc::Receiver<()>,
) {
    let send = |event: CommandEvent| {
        let _ = events.send(event);
    };

    let exit_code = loop {
        tokio::select! {
            biased;

            Some(()) = cancel_rx.recv() => {
                // Detach before the kill: no late output from a dying process
                readers.detach();
                send(CommandEvent::Output { id, text: CANCEL_MARKER.to_string() });
                break kill_and_reap(&mut child, &command_line).await;
            }
            Some(chunk) = readers.chunks.recv() => {
                if let Some(text) = render_chunk(chunk) {
                    send(CommandEvent::Output { id, text });
                }
            }
            status = child.wait() => {
                let code = match status {
                    Ok(status) => exit_code(status),
                    Err(e) => {
                        tracing::warn!("Failed to wait for command #{}: {}", id, e);
                        UNREAPED_EXIT_CODE
                    }
                };

                // Pipes may outlive the shell (background children); cancel
                // still wins while they drain
                let drain = async {
                    loop {
                        tokio::select! {
                            biased;

                            Some(()) = cancel_rx.recv() => return true,
                            chunk = readers.chunks.recv() => match chunk {
                                Some(chunk) => {
                                    if let Some(text) = render_chunk(chunk) {
                                        send(CommandEvent::Output { id, text });
                                    }
                                }
                                None => return false,
                            },
                        }
                    }
                };
                let cancelled = match tokio::time::timeout(OUTPUT_DRAIN_TIMEOUT, drain).await {
                    Ok(cancelled) => cancelled,
                    Err(_) => {
                        tracing::warn!("Output pipes of #{} still open after exit", id);
                        false
                    }
                };
                readers.detach();
                if cancelled {
                    tracing::info!("Command #{} cancelled while draining output", id);
                    send(CommandEvent::Output { id, text: CANCEL_MARKER.to_string() });
                }
                break code;
            }
        }
    };

    tracing::info!("Command #{} finished with exit code {}", id, exit_code);
    send(CommandEvent::Output {
        id,
        text: constants::separator(),
    });
    send(CommandEvent::Finished { id, exit_code });
}

async fn kill_and_reap(child: &mut Child, command_line: &str) -> i32 {
    if let Err(e) = child.start_kill() {
        tracing::warn!("Failed to kill `{}`: {}", command_line, e);
    }

    match tokio::time::timeout(REAP_TIMEOUT, child.wait()).await {
        Ok(Ok(status)) => exit_code(status),
        Ok(Err(e)) => {
            tracing::warn!("Failed to reap `{}`: {}", command_line, e);
            UNREAPED_EXIT_CODE
        }
        Err(_) => {
            tracing::warn!("`{}` was not reaped in time and may be orphaned", command_line);
            UNREAPED_EXIT_CODE
        }
    }
}

/// Console text for a chunk; stderr noise caused by our own kill is dropped
fn render_chunk(chunk: Chunk) -> Option<String> {
    match chunk.stream {
        Stream::Stdout => Some(chunk.text),
        Stream::Stderr => {
            let lower = chunk.text.to_lowercase();
            if KILL_NOISE.iter().any(|noise| lower.contains(noise)) {
                None
            } else {
                Some(format!("{}{}", STDERR_PREFIX, chunk.text))
            }
        }
    }
}

/// Exit code, or 128 + signal for killed processes
fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(UNREAPED_EXIT_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::outcome::{Affordance, OutcomeKind, OutputBuffer};

    /// `env` stands in for pkexec so elevated commands still run unprivileged
    fn supervisor() -> (ProcessSupervisor, mpsc::UnboundedReceiver<CommandEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let supervisor = ProcessSupervisor::new(tx)
            .with_shell("/bin/sh")
            .with_policy(ElevationPolicy::new("env"))
            .with_language(Language::English);
        (supervisor, rx)
    }

    async fn collect_until_finished(
        rx: &mut mpsc::UnboundedReceiver<CommandEvent>,
    ) -> Vec<CommandEvent> {
        let mut events = Vec::new();
        loop {
            let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
                .await
                .expect("timed out waiting for events")
                .expect("event channel closed");
            let finished = matches!(event, CommandEvent::Finished { .. });
            events.push(event);
            if finished {
                return events;
            }
        }
    }

    fn outputs(events: &[CommandEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                CommandEvent::Output { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_console_command_event_order() {
        let (mut supervisor, mut rx) = supervisor();
        let execution = supervisor.execute(&CommandInvocation::console("echo done")).await;
        let id = match execution {
            Execution::Spawned(id) => id,
            other => panic!("Expected Spawned, got {:?}", other),
        };

        let events = collect_until_finished(&mut rx).await;
        assert_eq!(
            events.first(),
            Some(&CommandEvent::Started {
                id,
                command_line: "env echo done".to_string()
            })
        );
        assert_eq!(events.last(), Some(&CommandEvent::Finished { id, exit_code: 0 }));
        assert_eq!(outputs(&events), vec!["done", constants::separator().as_str()]);

        supervisor.release(id);
        assert!(!supervisor.is_running());
    }

    #[tokio::test]
    async fn test_successful_console_command_offers_close() {
        let (mut supervisor, mut rx) = supervisor();
        supervisor.execute(&CommandInvocation::console("echo done")).await;

        let mut buffer = OutputBuffer::new();
        let mut exit = None;
        for event in collect_until_finished(&mut rx).await {
            match event {
                CommandEvent::Output { text, .. } => buffer.push(&text),
                CommandEvent::Finished { exit_code, .. } => exit = Some(exit_code),
                CommandEvent::Started { .. } => buffer.clear(),
            }
        }

        let outcome = supervisor
            .classifier()
            .classify(exit.unwrap(), buffer.as_str(), false);
        assert_eq!(outcome.kind(), OutcomeKind::Success);
        assert_eq!(outcome.affordance(), Affordance::Close);
    }

    #[tokio::test]
    async fn test_stderr_is_prefixed() {
        let (mut supervisor, mut rx) = supervisor();
        supervisor
            .execute(&CommandInvocation::console("echo oops 1>&2"))
            .await;
        let events = collect_until_finished(&mut rx).await;
        assert!(outputs(&events).contains(&"ERROR: oops"));
    }

    #[tokio::test]
    async fn test_kill_noise_on_stderr_is_dropped() {
        let (mut supervisor, mut rx) = supervisor();
        supervisor
            .execute(&CommandInvocation::console("echo 'Process Terminated' 1>&2; echo ok"))
            .await;
        let events = collect_until_finished(&mut rx).await;
        let outputs = outputs(&events);
        assert!(outputs.contains(&"ok"));
        assert!(!outputs.iter().any(|o| o.contains("Terminated")));
    }

    #[tokio::test]
    async fn test_non_zero_exit_code_is_reported() {
        let (mut supervisor, mut rx) = supervisor();
        supervisor
            .execute(&CommandInvocation::console("sh -c 'exit 3'"))
            .await;
        let events = collect_until_finished(&mut rx).await;
        assert!(matches!(
            events.last(),
            Some(CommandEvent::Finished { exit_code: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_env_overrides_reach_child() {
        let (mut supervisor, mut rx) = supervisor();
        let invocation = CommandInvocation::console("printenv IMMUTABLE_TOOLS_TEST")
            .with_env("IMMUTABLE_TOOLS_TEST", "from-override");
        supervisor.execute(&invocation).await;
        let events = collect_until_finished(&mut rx).await;
        assert!(outputs(&events).contains(&"from-override"));
    }

    #[tokio::test]
    async fn test_cancel_emits_marker_then_single_finished() {
        let (mut supervisor, mut rx) = supervisor();
        supervisor
            .execute(&CommandInvocation::console("sleep 30").with_reboot(true))
            .await;
        assert!(supervisor.is_running());

        assert!(supervisor.cancel().await);
        assert!(!supervisor.is_running());

        let events = collect_until_finished(&mut rx).await;
        let finished = events
            .iter()
            .filter(|e| matches!(e, CommandEvent::Finished { .. }))
            .count();
        assert_eq!(finished, 1);
        assert!(outputs(&events).contains(&CANCEL_MARKER));

        let mut buffer = OutputBuffer::new();
        let mut exit = 0;
        for event in &events {
            match event {
                CommandEvent::Output { text, .. } => buffer.push(text),
                CommandEvent::Finished { exit_code, .. } => exit = *exit_code,
                CommandEvent::Started { .. } => {}
            }
        }
        assert_ne!(exit, 0);
        let outcome = supervisor.classifier().classify(exit, buffer.as_str(), true);
        assert_eq!(outcome.kind(), OutcomeKind::Cancelled);
        assert_eq!(outcome.affordance(), Affordance::Close);

        // Nothing else arrives for the cancelled invocation
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_while_background_child_holds_pipes() {
        let (mut supervisor, mut rx) = supervisor();
        supervisor
            .execute(
                &CommandInvocation::console("sh -c '(sleep 1; echo late) & echo first'")
                    .with_reboot(true),
            )
            .await;

        // The shell has exited by now; its background child keeps the pipes open
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(supervisor.cancel().await);

        let events = collect_until_finished(&mut rx).await;
        let outputs = outputs(&events);
        assert!(outputs.contains(&CANCEL_MARKER));
        assert!(!outputs.contains(&"late"));

        let mut buffer = OutputBuffer::new();
        let mut exit = None;
        for event in &events {
            match event {
                CommandEvent::Output { text, .. } => buffer.push(text),
                CommandEvent::Finished { exit_code, .. } => exit = Some(*exit_code),
                CommandEvent::Started { .. } => {}
            }
        }
        let outcome = supervisor
            .classifier()
            .classify(exit.unwrap(), buffer.as_str(), true);
        assert_eq!(outcome.kind(), OutcomeKind::Cancelled);
        assert_eq!(outcome.affordance(), Affordance::Close);

        // The background child's late line and a second Finished never arrive
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_partial_line_is_forwarded_before_newline() {
        let (mut supervisor, mut rx) = supervisor();
        supervisor
            .execute(&CommandInvocation::console(
                "printf 'Progress 50%%'; sleep 2; echo ' done'",
            ))
            .await;

        assert!(matches!(rx.recv().await, Some(CommandEvent::Started { .. })));
        let event = tokio::time::timeout(Duration::from_millis(1500), rx.recv())
            .await
            .expect("partial output held back until newline")
            .expect("event channel closed");
        assert!(matches!(event, CommandEvent::Output { ref text, .. } if text == "Progress 50%"));

        let events = collect_until_finished(&mut rx).await;
        assert!(outputs(&events).contains(&" done"));
    }

    #[test]
    fn test_split_utf8_sequence_is_carried_to_next_read() {
        let mut pending = "año".as_bytes().to_vec();
        pending.truncate(2);
        assert_eq!(take_decodable(&mut pending), "a");
        assert_eq!(pending.len(), 1);

        pending.extend_from_slice(&"ño".as_bytes()[1..]);
        assert_eq!(take_decodable(&mut pending), "ño");
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_when_idle_is_noop() {
        let (mut supervisor, mut rx) = supervisor();
        assert!(!supervisor.cancel().await);
        assert!(!supervisor.is_running());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_after_completion_is_noop() {
        let (mut supervisor, mut rx) = supervisor();
        supervisor.execute(&CommandInvocation::console("true")).await;
        collect_until_finished(&mut rx).await;

        assert!(!supervisor.cancel().await);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_launch_failure_sends_single_output() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut supervisor = ProcessSupervisor::new(tx)
            .with_shell("/nonexistent/shell")
            .with_language(Language::English);

        let execution = supervisor
            .execute(&CommandInvocation::console("deepin-immutable-ctl admin deploy"))
            .await;
        assert!(matches!(execution, Execution::Failed(ref msg) if msg.starts_with("Error running command")));
        assert!(!supervisor.is_running());

        assert!(matches!(rx.try_recv(), Ok(CommandEvent::Started { .. })));
        assert!(matches!(rx.try_recv(), Ok(CommandEvent::Output { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_query_captures_stdout_and_stderr() {
        let (mut supervisor, mut rx) = supervisor();
        let execution = supervisor
            .execute(&CommandInvocation::query("echo hello; echo warn 1>&2"))
            .await;
        let outcome = match execution {
            Execution::Captured(outcome) => outcome,
            other => panic!("Expected Captured, got {:?}", other),
        };
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.output, "hello\n\n\nERROR:\nwarn\n");
        // Synchronous queries never touch the console state
        assert!(!supervisor.is_running());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_query_timeout() {
        let (supervisor, _rx) = supervisor();
        let supervisor = supervisor.with_query_timeout(Duration::from_millis(100));
        let result = supervisor.query(&CommandInvocation::query("sleep 5")).await;
        assert!(matches!(result, Err(CommandError::Timeout { .. })));
    }

    #[test]
    fn test_render_chunk() {
        let chunk = |stream, text: &str| Chunk {
            stream,
            text: text.to_string(),
        };
        assert_eq!(render_chunk(chunk(Stream::Stdout, "killed 3 jobs")), Some("killed 3 jobs".to_string()));
        assert_eq!(render_chunk(chunk(Stream::Stderr, "boom")), Some("ERROR: boom".to_string()));
        assert_eq!(render_chunk(chunk(Stream::Stderr, "bash: line 1: 42 KILLED")), None);
    }
}
