//! Non-interactive subcommands: print status, list snapshots, run one command

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::ExitCode;
use tokio::sync::mpsc;

use crate::commands::immutable;
use crate::commands::outcome::{OutcomeClassifier, OutputBuffer};
use crate::commands::supervisor::{Execution, ProcessSupervisor};
use crate::commands::{CommandEvent, CommandInvocation};
use crate::config::Settings;
use crate::i18n::Text;

fn supervisor(settings: &Settings) -> (ProcessSupervisor, mpsc::UnboundedReceiver<CommandEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let supervisor = ProcessSupervisor::new(tx)
        .with_classifier(OutcomeClassifier::new(&settings.auth_failure_phrases))
        .with_language(settings.language)
        .with_query_timeout(settings.query_timeout());
    (supervisor, rx)
}

/// Print the writable status and the immutable flag
pub async fn status(settings: &Settings) -> Result<ExitCode> {
    let lang = settings.language;
    let (supervisor, _rx) = supervisor(settings);

    let writable = supervisor
        .query(&CommandInvocation::query(immutable::writable_status_query()))
        .await?;
    let Some(status) = immutable::parse_writable_status(&writable.output) else {
        bail!("Unexpected status output: {}", writable.output.trim());
    };

    let flag = |value: bool| lang.tr(if value { Text::Yes } else { Text::No });
    if status.is_immutable() {
        println!("{}", lang.tr(Text::StatusImmutable));
    } else {
        println!("{}", lang.tr(Text::StatusWritable));
    }
    println!("{}:", lang.tr(Text::ParamsGroup));
    println!("  {}: {}", lang.tr(Text::ParamWhitelist), status.whitelist);
    println!(
        "  {}: {}",
        lang.tr(Text::ParamClearAfterReboot),
        flag(status.clear_after_reboot)
    );
    println!("  {}: {}", lang.tr(Text::ParamCleanData), flag(status.clean_data));
    println!("  {}: {}", lang.tr(Text::ParamOverlayDirs), status.overlay_dirs);
    println!(
        "  {}: {}",
        lang.tr(Text::ParamOverlayAllDirs),
        flag(status.overlay_all_dirs)
    );

    // The ctl flag is informational; a failure here should not hide the status above
    match supervisor
        .query(&CommandInvocation::query(immutable::immutable_status_query()))
        .await
    {
        Ok(outcome) => println!(
            "immutable-status: {}",
            immutable::parse_immutable_status(&outcome.output)
        ),
        Err(e) => tracing::warn!("Immutable status query failed: {}", e),
    }

    Ok(ExitCode::SUCCESS)
}

/// Print the snapshot list as a table
pub async fn snapshots(settings: &Settings) -> Result<ExitCode> {
    let (supervisor, _rx) = supervisor(settings);
    let outcome = supervisor
        .query(&CommandInvocation::query(immutable::snapshot_list_query()))
        .await?;
    if !outcome.is_successful() {
        eprintln!("{}", outcome.output.trim());
        return Ok(ExitCode::FAILURE);
    }

    let entries = immutable::parse_snapshot_list(&outcome.output);
    if entries.is_empty() {
        println!("{}", settings.language.tr(Text::SnapshotsEmpty));
        return Ok(ExitCode::SUCCESS);
    }

    println!("{:<6} {:<24} {:<17} DESCRIPTION", "ID", "NAME", "CREATED");
    for entry in entries {
        println!(
            "{:<6} {:<24} {:<17} {}",
            entry.id,
            entry.name,
            entry.created_display(),
            entry.description
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Run one command through the console path, streaming its output to stdout
///
/// Ctrl+C cancels the command the same way the console's cancel key does.
pub async fn run(settings: &Settings, command: &str, requires_reboot: bool) -> Result<ExitCode> {
    let lang = settings.language;
    let (mut supervisor, mut rx) = supervisor(settings);
    let invocation = CommandInvocation::console(command).with_reboot(requires_reboot);

    let id = match supervisor.execute(&invocation).await {
        Execution::Spawned(id) => id,
        Execution::Failed(message) => {
            eprintln!("{}", message);
            return Ok(ExitCode::FAILURE);
        }
        Execution::Captured(outcome) => {
            println!("{}", outcome.output);
            return Ok(exit_code(outcome.exit_code));
        }
    };

    let mut buffer = OutputBuffer::new();
    let mut cancelled = false;
    let exit = loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else {
                    bail!("Command event channel closed before the command finished");
                };
                if event.id() != id {
                    continue;
                }
                match event {
                    CommandEvent::Started { command_line, .. } => println!("$ {}", command_line),
                    CommandEvent::Output { text, .. } => {
                        println!("{}", text);
                        buffer.push(&text);
                    }
                    CommandEvent::Finished { exit_code, .. } => {
                        supervisor.release(id);
                        break exit_code;
                    }
                }
            }
            signal = tokio::signal::ctrl_c(), if !cancelled => {
                signal.context("Failed to listen for Ctrl+C")?;
                cancelled = true;
                tracing::info!("Ctrl+C received, cancelling {}", command);
                supervisor.cancel().await;
            }
        }
    };

    let outcome = supervisor
        .classifier()
        .classify(exit, buffer.as_str(), requires_reboot);
    for line in outcome.summary(lang) {
        println!("{}", line);
    }
    Ok(exit_code(outcome.exit_code))
}

/// Print where settings live and what they currently contain
pub fn config(settings: &Settings, path: &Path) -> Result<ExitCode> {
    println!("{}", path.display());
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(ExitCode::SUCCESS)
}

/// Map a child exit code onto the process exit code
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(0), ExitCode::from(0));
        assert_eq!(exit_code(3), ExitCode::from(3));
        assert_eq!(exit_code(-1), ExitCode::FAILURE);
        assert_eq!(exit_code(300), ExitCode::FAILURE);
    }

    #[test]
    fn test_config_prints_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(config(&Settings::default(), &path).unwrap(), ExitCode::SUCCESS);
    }
}
