//! Application state management
//!
//! This module contains the core application state and is split into:
//! - `state.rs` - Focus, dialogs and text forms
//! - `console.rs` - Console overlay for the running command
//! - `handlers.rs` - Keyboard input handlers
//! - `messages.rs` - Command event handling

pub mod console;
mod handlers;
mod messages;
pub mod state;

use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::commands::outcome::OutcomeClassifier;
use crate::commands::supervisor::{Execution, ProcessSupervisor};
use crate::commands::{CommandEvent, CommandInvocation};
use crate::config::Settings;
use crate::constants::SPINNER_TICK_MS;
use crate::i18n::{Language, Text};
use crate::panels::{self, Action, Panel, PanelKind};
use crate::ui::theme::Theme;
use crate::ui::widgets::Spinner;

pub use console::ConsoleState;
pub use state::{Dialog, Focus};

/// Main application state
pub struct App {
    pub settings: Settings,
    settings_path: PathBuf,
    pub theme: Theme,
    pub panels: Vec<Box<dyn Panel>>,
    pub active_panel: usize,
    pub focus: Focus,
    pub dialog: Option<Dialog>,
    pub console: Option<ConsoleState>,
    pub supervisor: ProcessSupervisor,
    pub should_quit: bool,
    pub spinner_state: usize,
    last_tick: Instant,
    last_status_refresh: Instant,
    transcript: Option<File>,
    pub transcript_path: PathBuf,
}

impl App {
    pub fn new(
        settings: Settings,
        settings_path: PathBuf,
        transcript_path: PathBuf,
        events: mpsc::UnboundedSender<CommandEvent>,
    ) -> Self {
        // Console transcript, truncated on every start
        if let Some(log_dir) = transcript_path.parent() {
            let _ = std::fs::create_dir_all(log_dir);
        }

        let mut transcript = match File::create(&transcript_path) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!("Failed to create console log file: {}", e);
                None
            }
        };

        if let Some(ref mut file) = transcript {
            let _ = writeln!(file, "=== Immutable Tools Console Log ===\n");
            let _ = file.flush();
        }

        let supervisor = ProcessSupervisor::new(events)
            .with_classifier(OutcomeClassifier::new(&settings.auth_failure_phrases))
            .with_language(settings.language)
            .with_query_timeout(settings.query_timeout());

        Self {
            theme: Theme::from(settings.theme),
            settings,
            settings_path,
            panels: panels::all_panels(),
            active_panel: 0,
            focus: Focus::default(),
            dialog: None,
            console: None,
            supervisor,
            should_quit: false,
            spinner_state: 0,
            last_tick: Instant::now(),
            last_status_refresh: Instant::now(),
            transcript,
            transcript_path,
        }
    }

    pub fn lang(&self) -> Language {
        self.settings.language
    }

    pub fn active_kind(&self) -> PanelKind {
        self.panels
            .get(self.active_panel)
            .map(|p| p.kind())
            .unwrap_or(PanelKind::Status)
    }

    /// Append console lines to the transcript file
    pub fn log_to_transcript(&mut self, lines: &[String]) {
        if let Some(ref mut file) = self.transcript {
            let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            for line in lines {
                let _ = writeln!(file, "[{}] {}", stamp, line);
            }
            let _ = file.flush();
        }
    }

    /// Called on each loop iteration to update animations
    pub fn tick(&mut self) {
        if self.last_tick.elapsed().as_millis() >= SPINNER_TICK_MS {
            self.spinner_state = (self.spinner_state + 1) % Spinner::frames();
            self.last_tick = Instant::now();
        }
    }

    /// Background status refresh while nothing else is on screen
    pub async fn refresh_if_due(&mut self) {
        let Some(interval) = self.settings.status_refresh_interval() else {
            return;
        };
        if self.console.is_some() || self.dialog.is_some() {
            return;
        }
        if self.last_status_refresh.elapsed() >= interval {
            self.refresh_panel(PanelKind::Status).await;
        }
    }

    pub async fn refresh_all(&mut self) {
        for kind in PanelKind::ALL {
            self.refresh_panel(kind).await;
        }
    }

    /// Run the panel's query on the synchronous path and hand it the result
    pub async fn refresh_panel(&mut self, kind: PanelKind) {
        let lang = self.lang();
        let Some(index) = self.panels.iter().position(|p| p.kind() == kind) else {
            return;
        };
        let Some(query) = self.panels[index].refresh_query() else {
            return;
        };

        if kind == PanelKind::Status {
            self.last_status_refresh = Instant::now();
        }

        let result = self
            .supervisor
            .query(&CommandInvocation::query(query))
            .await
            .map_err(|e| {
                tracing::warn!("Refresh of {:?} failed: {}", kind, e);
                lang.fmt(Text::QueryError, e)
            });
        self.panels[index].apply_refresh(result);
    }

    /// Carry out what a panel or form asked for
    pub async fn perform(&mut self, action: Action) {
        match action {
            Action::Confirm {
                message,
                invocation,
            } => {
                self.dialog = Some(Dialog::confirm(message, invocation));
            }
            Action::Run(invocation) => self.run_in_console(invocation).await,
            Action::OpenForm(form) => self.dialog = Some(Dialog::Form(form)),
            Action::Notice(message) => self.dialog = Some(Dialog::Notice(message)),
            Action::Refresh => {
                let kind = self.active_kind();
                self.refresh_panel(kind).await;
            }
        }
    }

    /// Open the console and start the command in it
    pub async fn run_in_console(&mut self, invocation: CommandInvocation) {
        let lang = self.lang();
        let mut console = ConsoleState::new(&invocation, lang.tr(Text::ConsoleTitle));

        let lines = match self.supervisor.execute(&invocation).await {
            Execution::Spawned(id) => {
                console.attach(id);
                Vec::new()
            }
            Execution::Failed(message) => {
                console.on_launch_failed(&message, self.supervisor.classifier(), lang)
            }
            Execution::Captured(outcome) => {
                let mut lines = console.on_output(&outcome.output);
                lines.extend(console.on_finished(
                    outcome.exit_code,
                    self.supervisor.classifier(),
                    lang,
                ));
                lines
            }
        };

        self.console = Some(console);
        self.log_to_transcript(&lines);
    }

    pub fn toggle_theme(&mut self) {
        self.settings.theme = self.settings.theme.toggled();
        self.theme = Theme::from(self.settings.theme);
        self.save_settings();
    }

    pub fn toggle_language(&mut self) {
        self.settings.language = self.settings.language.toggled();
        self.supervisor.set_language(self.settings.language);
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save(&self.settings_path) {
            tracing::warn!("Failed to save settings: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::elevation::ElevationPolicy;
    use crate::commands::immutable;
    use crate::commands::outcome::Affordance;
    use crossterm::event::KeyCode;
    use std::time::Duration;

    /// App whose commands run unprivileged under /bin/sh
    fn test_app(dir: &tempfile::TempDir) -> (App, mpsc::UnboundedReceiver<CommandEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let settings = Settings {
            language: Language::English,
            ..Settings::default()
        };
        let mut app = App::new(
            settings,
            dir.path().join("settings.json"),
            dir.path().join("console.log"),
            tx.clone(),
        );
        app.supervisor = ProcessSupervisor::new(tx)
            .with_shell("/bin/sh")
            .with_policy(ElevationPolicy::new("env"))
            .with_language(Language::English);
        (app, rx)
    }

    async fn pump_until_finished(app: &mut App, rx: &mut mpsc::UnboundedReceiver<CommandEvent>) {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
                .await
                .expect("timed out waiting for events")
                .expect("event channel closed");
            let finished = matches!(event, CommandEvent::Finished { .. });
            app.handle_command_event(event).await;
            if finished {
                return;
            }
        }
    }

    #[tokio::test]
    async fn test_console_run_prompts_for_reboot() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, mut rx) = test_app(&dir);

        app.run_in_console(CommandInvocation::console("echo staged").with_reboot(true))
            .await;
        assert!(app.console.as_ref().unwrap().is_running());

        pump_until_finished(&mut app, &mut rx).await;
        let console = app.console.as_ref().unwrap();
        assert_eq!(console.affordance(), Some(Affordance::RebootPrompt));
        assert!(console.lines().iter().any(|l| l == "staged"));
        assert!(!app.supervisor.is_running());

        // Later closes without rebooting
        app.handle_key(KeyCode::Char('l')).await.unwrap();
        assert!(app.console.is_none());
    }

    #[tokio::test]
    async fn test_cancel_from_console() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, mut rx) = test_app(&dir);

        app.run_in_console(CommandInvocation::console("sleep 30").with_reboot(true))
            .await;
        app.handle_key(KeyCode::Char('c')).await.unwrap();
        assert!(!app.supervisor.is_running());

        pump_until_finished(&mut app, &mut rx).await;
        let console = app.console.as_ref().unwrap();
        assert!(console.outcome().unwrap().user_cancelled);
        assert_eq!(console.affordance(), Some(Affordance::Close));

        app.handle_key(KeyCode::Enter).await.unwrap();
        assert!(app.console.is_none());
    }

    #[tokio::test]
    async fn test_confirm_dialog_defaults_to_no() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);

        app.perform(Action::Confirm {
            message: "sure?".into(),
            invocation: immutable::rollback(),
        })
        .await;
        app.handle_key(KeyCode::Enter).await.unwrap();
        assert!(app.dialog.is_none());
        assert!(app.console.is_none());
    }

    #[tokio::test]
    async fn test_launch_failure_opens_closable_console() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);
        app.supervisor = ProcessSupervisor::new(mpsc::unbounded_channel().0)
            .with_shell("/nonexistent/shell")
            .with_language(Language::English);

        app.run_in_console(immutable::rollback()).await;
        let console = app.console.as_ref().unwrap();
        assert_eq!(console.affordance(), Some(Affordance::Close));
        assert!(console.lines()[0].starts_with("Error running command"));
    }

    #[tokio::test]
    async fn test_toggles_persist_settings() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);

        app.handle_key(KeyCode::Char('t')).await.unwrap();
        app.handle_key(KeyCode::Char('L')).await.unwrap();

        let saved = Settings::load(&dir.path().join("settings.json"));
        assert_eq!(saved.theme, crate::config::ThemeChoice::Light);
        assert_eq!(saved.language, Language::Spanish);
        assert_eq!(app.lang(), Language::Spanish);
    }

    #[tokio::test]
    async fn test_refresh_failure_reaches_panel() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _rx) = test_app(&dir);
        app.supervisor = ProcessSupervisor::new(mpsc::unbounded_channel().0)
            .with_shell("/nonexistent/shell")
            .with_language(Language::English);

        // Must not panic or open anything
        app.refresh_all().await;
        assert!(app.console.is_none());
        assert!(app.dialog.is_none());
    }
}
