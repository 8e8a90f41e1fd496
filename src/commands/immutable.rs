//! Command lines for the deepin immutable CLIs and parsers for their output

use chrono::NaiveDateTime;

use super::CommandInvocation;
use crate::constants::{CTL_BIN, ELEVATION_PREFIX, WRITABLE_BIN};

/// Marker the supervisor puts between captured stdout and stderr
const STDERR_SECTION: &str = "\n\nERROR:\n";

/// Timestamp layouts printed by `snapshot list`
const SNAPSHOT_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y/%m/%d %H:%M:%S"];

/// Double-quote a user-supplied value for the shell
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn elevated(args: &str) -> String {
    format!("{} {}", ELEVATION_PREFIX, args)
}

// ---- Status ----

pub fn writable_status_query() -> String {
    format!("{} status", WRITABLE_BIN)
}

pub fn immutable_status_query() -> String {
    format!("{} --immutable-status", CTL_BIN)
}

/// Makes /usr writable (turns immutability off)
pub fn disable_immutability() -> CommandInvocation {
    CommandInvocation::console(elevated(&format!("{} enable -d /usr -y", WRITABLE_BIN)))
        .with_reboot(true)
}

/// Makes /usr read-only again
pub fn enable_immutability() -> CommandInvocation {
    CommandInvocation::console(elevated(&format!("{} disable -y", WRITABLE_BIN))).with_reboot(true)
}

// ---- Admin ----

/// Flags for `admin deploy`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOptions {
    pub backup: bool,
    pub refresh: bool,
    pub append: bool,
}

impl DeployOptions {
    pub fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.backup {
            flags.push("--backup");
        }
        if self.refresh {
            flags.push("--refresh");
        }
        if self.append {
            flags.push("--append");
        }
        flags
    }
}

pub fn deploy(options: DeployOptions) -> CommandInvocation {
    let mut command = elevated(&format!("{} admin deploy", CTL_BIN));
    for flag in options.flags() {
        command.push(' ');
        command.push_str(flag);
    }
    CommandInvocation::console(command)
}

pub fn finalize() -> CommandInvocation {
    CommandInvocation::console(elevated(&format!("{} admin deploy --finalize", CTL_BIN)))
        .with_reboot(true)
}

pub fn rollback() -> CommandInvocation {
    CommandInvocation::console(elevated(&format!("{} admin rollback", CTL_BIN))).with_reboot(true)
}

/// Run an arbitrary shell command inside the deployment; always elevated
///
/// The payload goes to `bash -c` as one quoted argument so operators such as
/// `&&` or `;` run inside the deployment, not in the outer shell.
pub fn admin_exec(command: &str) -> CommandInvocation {
    CommandInvocation::console(format!(
        "{} admin exec -- bash -c {}",
        CTL_BIN,
        quote(command.trim())
    ))
}

pub fn file_op(operation: &str) -> CommandInvocation {
    CommandInvocation::console(elevated(&format!(
        "{} admin file-op {}",
        CTL_BIN,
        operation.trim()
    )))
}

// ---- Snapshots ----

pub fn snapshot_list_query() -> String {
    format!("{} snapshot list", CTL_BIN)
}

pub fn snapshot_show(id: &str) -> CommandInvocation {
    CommandInvocation::console(format!("{} snapshot show {}", CTL_BIN, quote(id)))
}

/// Empty name or description are left out
pub fn snapshot_create(name: &str, description: &str) -> CommandInvocation {
    let mut command = elevated(&format!("{} snapshot create", CTL_BIN));
    if !name.trim().is_empty() {
        command.push_str(&format!(" --name={}", quote(name.trim())));
    }
    if !description.trim().is_empty() {
        command.push_str(&format!(" --description={}", quote(description.trim())));
    }
    CommandInvocation::console(command)
}

/// None when neither a new name nor a new description is given
pub fn snapshot_modify(id: &str, name: &str, description: &str) -> Option<CommandInvocation> {
    let mut changes = Vec::new();
    if !name.trim().is_empty() {
        changes.push(format!("--set-name={}", quote(name.trim())));
    }
    if !description.trim().is_empty() {
        changes.push(format!("--set-description={}", quote(description.trim())));
    }
    if changes.is_empty() {
        return None;
    }

    Some(CommandInvocation::console(elevated(&format!(
        "{} snapshot modify {} {}",
        CTL_BIN,
        quote(id),
        changes.join(" ")
    ))))
}

pub fn snapshot_delete(id: &str) -> CommandInvocation {
    CommandInvocation::console(elevated(&format!("{} snapshot delete {}", CTL_BIN, quote(id))))
}

pub fn snapshot_rollback(id: &str) -> CommandInvocation {
    CommandInvocation::console(elevated(&format!("{} snapshot rollback {}", CTL_BIN, quote(id))))
        .with_reboot(true)
}

/// Reboot runs on the synchronous path; the console is closed by then
pub fn reboot() -> CommandInvocation {
    CommandInvocation::query(elevated("systemctl reboot"))
}

// ---- Refresh routing ----

/// Which view to reload after a successful command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTarget {
    Status,
    Snapshots,
}

pub fn refresh_target(command: &str) -> Option<RefreshTarget> {
    if command.contains("snapshot") {
        Some(RefreshTarget::Snapshots)
    } else if !command.contains("immutable-status")
        && (command.contains("deploy") || command.contains("rollback"))
    {
        Some(RefreshTarget::Status)
    } else if command.contains(WRITABLE_BIN) {
        Some(RefreshTarget::Status)
    } else {
        None
    }
}

// ---- Parsers ----

/// One row of `snapshot list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: String,
    pub name: String,
    /// Date and time columns as printed
    pub created: String,
    pub timestamp: Option<NaiveDateTime>,
    pub description: String,
}

impl SnapshotEntry {
    pub fn created_display(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
            None => self.created.clone(),
        }
    }
}

fn stdout_section(output: &str) -> &str {
    output.split(STDERR_SECTION).next().unwrap_or(output)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    SNAPSHOT_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse `snapshot list`: header skipped, rows need at least 4 columns
pub fn parse_snapshot_list(output: &str) -> Vec<SnapshotEntry> {
    stdout_section(output)
        .lines()
        .skip(1)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return None;
            }
            let created = parts[2..4].join(" ");
            Some(SnapshotEntry {
                id: parts[0].to_string(),
                name: parts[1].to_string(),
                timestamp: parse_timestamp(&created),
                created,
                description: parts[4..].join(" "),
            })
        })
        .collect()
}

/// Parsed `deepin-immutable-writable status`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritableStatus {
    /// Writable mode configured (system is NOT immutable)
    pub enabled: bool,
    pub booted: bool,
    pub whitelist: String,
    pub clear_after_reboot: bool,
    pub clean_data: bool,
    pub overlay_dirs: String,
    pub overlay_all_dirs: bool,
}

impl WritableStatus {
    pub fn is_immutable(&self) -> bool {
        !self.enabled
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "1" | "on")
}

/// Parse `Key: value` lines; None when the output has no `Enable` key
pub fn parse_writable_status(output: &str) -> Option<WritableStatus> {
    let mut status = WritableStatus::default();
    let mut seen_enable = false;

    for line in stdout_section(output).lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().trim_end_matches(',').trim();
        match key.trim() {
            "Enable" => {
                status.enabled = parse_flag(value);
                seen_enable = true;
            }
            "Booted" => status.booted = parse_flag(value),
            "Whitelist" => status.whitelist = value.to_string(),
            "ClearAfterReboot" => status.clear_after_reboot = parse_flag(value),
            "CleanData" => status.clean_data = parse_flag(value),
            "OverlayDirs" => status.overlay_dirs = value.to_string(),
            "OverlayAllDirs" => status.overlay_all_dirs = parse_flag(value),
            other => tracing::debug!("Ignoring writable status key: {}", other),
        }
    }

    seen_enable.then_some(status)
}

/// `--immutable-status` prints true when the root is immutable
pub fn parse_immutable_status(output: &str) -> bool {
    stdout_section(output).to_lowercase().contains("true")
}
