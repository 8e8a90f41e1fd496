//! Command event handling for the application

use super::App;
use crate::commands::immutable;
use crate::commands::CommandEvent;
use crate::panels::PanelKind;

impl App {
    /// Handle events from the running console command
    pub async fn handle_command_event(&mut self, event: CommandEvent) {
        let lang = self.lang();

        let Some(console) = self.console.as_mut().filter(|c| c.accepts(&event)) else {
            // Events for a console that was already closed
            if let CommandEvent::Finished { id, .. } = event {
                self.supervisor.release(id);
            }
            return;
        };

        let lines = match &event {
            CommandEvent::Started { command_line, .. } => console.on_started(command_line),
            CommandEvent::Output { text, .. } => console.on_output(text),
            CommandEvent::Finished { id, exit_code } => {
                let lines = console.on_finished(*exit_code, self.supervisor.classifier(), lang);
                self.supervisor.release(*id);
                lines
            }
        };
        self.log_to_transcript(&lines);

        if !matches!(event, CommandEvent::Finished { .. }) {
            return;
        }

        let Some(console) = self.console.as_ref() else {
            return;
        };
        let succeeded = console.outcome().is_some_and(|o| o.is_successful());
        tracing::info!(
            "Command finished: {} ({})",
            console.command,
            if succeeded { "ok" } else { "failed" }
        );

        if succeeded {
            if let Some(target) = immutable::refresh_target(&console.command) {
                self.refresh_panel(PanelKind::for_target(target)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::{App, ConsoleState};
    use crate::commands::{CommandEvent, CommandInvocation};
    use crate::config::Settings;
    use crate::i18n::Language;
    use tokio::sync::mpsc;

    fn app(dir: &tempfile::TempDir) -> App {
        let settings = Settings {
            language: Language::English,
            ..Settings::default()
        };
        App::new(
            settings,
            dir.path().join("settings.json"),
            dir.path().join("console.log"),
            mpsc::unbounded_channel().0,
        )
    }

    #[tokio::test]
    async fn test_events_without_console_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        app.handle_command_event(CommandEvent::Output {
            id: 1,
            text: "stray".into(),
        })
        .await;
        app.handle_command_event(CommandEvent::Finished { id: 1, exit_code: 0 })
            .await;
        assert!(app.console.is_none());
    }

    #[tokio::test]
    async fn test_events_from_other_invocations_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        let mut console = ConsoleState::new(&CommandInvocation::console("echo hi"), "Console");
        console.attach(2);
        app.console = Some(console);

        app.handle_command_event(CommandEvent::Output {
            id: 1,
            text: "old".into(),
        })
        .await;
        app.handle_command_event(CommandEvent::Output {
            id: 2,
            text: "new".into(),
        })
        .await;

        let console = app.console.as_ref().unwrap();
        assert!(console.lines().iter().any(|l| l == "new"));
        assert!(!console.lines().iter().any(|l| l == "old"));
        assert!(console.is_running());
    }

    #[tokio::test]
    async fn test_output_is_written_to_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        let mut console = ConsoleState::new(&CommandInvocation::console("echo hi"), "Console");
        console.attach(5);
        app.console = Some(console);

        app.handle_command_event(CommandEvent::Started {
            id: 5,
            command_line: "echo hi".into(),
        })
        .await;
        app.handle_command_event(CommandEvent::Output {
            id: 5,
            text: "hi".into(),
        })
        .await;

        let transcript = std::fs::read_to_string(&app.transcript_path).unwrap();
        assert!(transcript.starts_with("=== Immutable Tools Console Log ==="));
        assert!(transcript.contains("] $ echo hi"));
        assert!(transcript.contains("] hi"));
    }
}
