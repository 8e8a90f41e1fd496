//! Keyboard input handlers for the application

use anyhow::Result;
use crossterm::event::KeyCode;

use super::state::{Dialog, Focus, FormState};
use super::App;
use crate::commands::immutable;
use crate::commands::outcome::Affordance;
use crate::commands::supervisor::Execution;
use crate::panels::{Action, PanelKind};

/// Lines moved by PageUp/PageDown in the console
const PAGE_SCROLL: usize = 10;

impl App {
    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyCode) -> Result<()> {
        // The console sits above everything while it is open
        if self.console.is_some() {
            return self.handle_console_key(key).await;
        }

        if let Some(dialog) = self.dialog.take() {
            return self.handle_dialog_key(dialog, key).await;
        }

        // Global keys
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.dialog = Some(Dialog::ExitConfirm);
                return Ok(());
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
                return Ok(());
            }
            KeyCode::Char('L') => {
                self.toggle_language();
                return Ok(());
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Nav => Focus::Panel,
                    Focus::Panel => Focus::Nav,
                };
                return Ok(());
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < self.panels.len() {
                    self.select_panel(index);
                }
                return Ok(());
            }
            _ => {}
        }

        match self.focus {
            Focus::Nav => self.handle_nav_key(key),
            Focus::Panel => {
                if matches!(key, KeyCode::Esc | KeyCode::Left) {
                    self.focus = Focus::Nav;
                    return Ok(());
                }
                let lang = self.lang();
                let action = self
                    .panels
                    .get_mut(self.active_panel)
                    .and_then(|panel| panel.handle_key(key, lang));
                if let Some(action) = action {
                    self.perform(action).await;
                }
            }
        }

        Ok(())
    }

    fn select_panel(&mut self, index: usize) {
        self.active_panel = index;
        tracing::debug!("Switched to panel {:?}", self.active_kind());
    }

    fn handle_nav_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.active_panel > 0 {
                    self.select_panel(self.active_panel - 1);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.active_panel + 1 < self.panels.len() {
                    self.select_panel(self.active_panel + 1);
                }
            }
            KeyCode::Enter | KeyCode::Right => {
                // About has nothing to focus
                if self.active_kind() != PanelKind::About {
                    self.focus = Focus::Panel;
                }
            }
            KeyCode::Esc => self.dialog = Some(Dialog::ExitConfirm),
            _ => {}
        }
    }

    async fn handle_dialog_key(&mut self, dialog: Dialog, key: KeyCode) -> Result<()> {
        match dialog {
            Dialog::ExitConfirm => match key {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {}
                _ => self.dialog = Some(Dialog::ExitConfirm),
            },
            Dialog::Notice(message) => match key {
                KeyCode::Enter | KeyCode::Esc => {}
                _ => self.dialog = Some(Dialog::Notice(message)),
            },
            Dialog::Confirm {
                message,
                invocation,
                yes_selected,
            } => match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.perform(Action::Run(invocation)).await;
                }
                KeyCode::Enter if yes_selected => {
                    self.perform(Action::Run(invocation)).await;
                }
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                    tracing::debug!("Declined: {}", invocation.command);
                }
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                    self.dialog = Some(Dialog::Confirm {
                        message,
                        invocation,
                        yes_selected: !yes_selected,
                    });
                }
                _ => {
                    self.dialog = Some(Dialog::Confirm {
                        message,
                        invocation,
                        yes_selected,
                    });
                }
            },
            Dialog::Form(form) => self.handle_form_key(form, key).await,
        }
        Ok(())
    }

    async fn handle_form_key(&mut self, mut form: FormState, key: KeyCode) {
        match key {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                match form.submit(self.lang()) {
                    Ok(action) => self.perform(action).await,
                    Err(error) => {
                        form.error = Some(error);
                        self.dialog = Some(Dialog::Form(form));
                    }
                }
                return;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Up if form.has_presets() => form.cycle_preset(false),
            KeyCode::Down if form.has_presets() => form.cycle_preset(true),
            KeyCode::Up => form.prev_field(),
            KeyCode::Down => form.next_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) => form.insert_char(c),
            _ => {}
        }
        self.dialog = Some(Dialog::Form(form));
    }

    async fn handle_console_key(&mut self, key: KeyCode) -> Result<()> {
        let Some(console) = self.console.as_mut() else {
            return Ok(());
        };

        match key {
            KeyCode::Up | KeyCode::Char('k') => console.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => console.scroll_down(1),
            KeyCode::PageUp => console.scroll_up(PAGE_SCROLL),
            KeyCode::PageDown => console.scroll_down(PAGE_SCROLL),
            KeyCode::End => console.scroll_to_end(),
            _ => {}
        }

        if console.is_running() {
            if matches!(key, KeyCode::Esc | KeyCode::Char('c')) && !self.supervisor.cancel().await {
                tracing::debug!("Cancel requested but nothing was running");
            }
            return Ok(());
        }

        match console.affordance() {
            Some(Affordance::RebootPrompt) => match key {
                KeyCode::Enter | KeyCode::Char('r') => self.reboot_now().await,
                KeyCode::Esc | KeyCode::Char('l') => self.close_console(),
                _ => {}
            },
            Some(Affordance::Close) => {
                if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                    self.close_console();
                }
            }
            None => {}
        }
        Ok(())
    }

    fn close_console(&mut self) {
        if let Some(console) = self.console.take() {
            tracing::debug!("Closing console for: {}", console.command);
        }
    }

    /// Reboot on the synchronous path; the console stays open if it fails
    async fn reboot_now(&mut self) {
        let lang = self.lang();
        let mut lines = match self.console.as_mut() {
            Some(console) => console.on_reboot_started(lang),
            None => Vec::new(),
        };

        tracing::info!("Reboot requested from console");
        let failure = match self.supervisor.execute(&immutable::reboot()).await {
            Execution::Captured(outcome) if outcome.is_successful() => None,
            Execution::Captured(outcome) => Some(outcome.output),
            Execution::Failed(message) => Some(message),
            Execution::Spawned(_) => None,
        };

        match failure {
            None => {
                self.log_to_transcript(&lines);
                self.close_console();
            }
            Some(output) => {
                tracing::error!("Reboot failed: {}", output.trim());
                if let Some(console) = self.console.as_mut() {
                    lines.extend(console.on_reboot_failed(&output, lang));
                }
                self.log_to_transcript(&lines);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::commands::CommandEvent;
    use crate::config::Settings;
    use crate::i18n::Language;
    use tokio::sync::mpsc;

    fn app(dir: &tempfile::TempDir) -> App {
        let settings = Settings {
            language: Language::English,
            ..Settings::default()
        };
        let (tx, _rx) = mpsc::unbounded_channel::<CommandEvent>();
        App::new(
            settings,
            dir.path().join("settings.json"),
            dir.path().join("console.log"),
            tx,
        )
    }

    #[tokio::test]
    async fn test_quit_asks_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        app.handle_key(KeyCode::Char('q')).await.unwrap();
        assert!(matches!(app.dialog, Some(Dialog::ExitConfirm)));
        app.handle_key(KeyCode::Char('n')).await.unwrap();
        assert!(app.dialog.is_none());
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Esc).await.unwrap();
        app.handle_key(KeyCode::Char('y')).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_navigation_and_focus() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        app.handle_key(KeyCode::Down).await.unwrap();
        assert_eq!(app.active_kind(), PanelKind::Admin);
        app.handle_key(KeyCode::Enter).await.unwrap();
        assert_eq!(app.focus, Focus::Panel);
        app.handle_key(KeyCode::Esc).await.unwrap();
        assert_eq!(app.focus, Focus::Nav);

        app.handle_key(KeyCode::Char('4')).await.unwrap();
        assert_eq!(app.active_kind(), PanelKind::About);
        app.handle_key(KeyCode::Enter).await.unwrap();
        assert_eq!(app.focus, Focus::Nav);
    }

    #[tokio::test]
    async fn test_form_flow_to_confirm() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        // Admin panel, last entry is the file operation form
        app.handle_key(KeyCode::Char('2')).await.unwrap();
        app.handle_key(KeyCode::Tab).await.unwrap();
        app.handle_key(KeyCode::End).await.unwrap();
        app.handle_key(KeyCode::Enter).await.unwrap();
        assert!(matches!(app.dialog, Some(Dialog::Form(_))));

        // Empty submit keeps the form open with an error
        app.handle_key(KeyCode::Enter).await.unwrap();
        match &app.dialog {
            Some(Dialog::Form(form)) => assert!(form.error.is_some()),
            other => panic!("unexpected {:?}", other),
        }

        for c in "setxattr /opt/a user.k=v".chars() {
            app.handle_key(KeyCode::Char(c)).await.unwrap();
        }
        app.handle_key(KeyCode::Enter).await.unwrap();
        match &app.dialog {
            Some(Dialog::Confirm {
                invocation,
                yes_selected,
                ..
            }) => {
                assert!(!yes_selected);
                assert_eq!(
                    invocation.command,
                    "pkexec deepin-immutable-ctl admin file-op setxattr /opt/a user.k=v"
                );
            }
            other => panic!("unexpected {:?}", other),
        }

        // Esc declines without running anything
        app.handle_key(KeyCode::Esc).await.unwrap();
        assert!(app.dialog.is_none());
        assert!(app.console.is_none());
    }

    #[tokio::test]
    async fn test_form_keys_do_not_trigger_globals() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.perform(Action::OpenForm(FormState::create_snapshot())).await;

        for c in ['q', 't', 'L'] {
            app.handle_key(KeyCode::Char(c)).await.unwrap();
        }
        match &app.dialog {
            Some(Dialog::Form(form)) => assert_eq!(form.fields[0].value, "qtL"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(app.lang(), Language::English);
    }
}
