//! Immutable mode status and the writable toggle

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{step_selection, Action, Panel, PanelKind, RenderContext};
use crate::commands::immutable::{self, WritableStatus};
use crate::commands::outcome::CommandOutcome;
use crate::i18n::{Language, Text};
use crate::ui::layout::panel_layout;
use crate::ui::widgets::{MenuItem, MenuList};

const ACTIONS: [Text; 3] = [
    Text::ActionDisableImmutable,
    Text::ActionEnableImmutable,
    Text::ActionRefresh,
];

#[derive(Debug, Default)]
pub struct StatusPanel {
    status: Option<WritableStatus>,
    error: Option<String>,
    selected: usize,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<&WritableStatus> {
        self.status.as_ref()
    }

    /// Toggles are only offered once the state is known
    fn action_enabled(&self, action: Text) -> bool {
        match (action, &self.status) {
            (Text::ActionDisableImmutable, Some(s)) => s.is_immutable(),
            (Text::ActionEnableImmutable, Some(s)) => !s.is_immutable(),
            (Text::ActionRefresh, _) => true,
            _ => false,
        }
    }

    fn confirm(lang: Language, text: Text, invocation: crate::commands::CommandInvocation) -> Action {
        Action::Confirm {
            message: format!("{}\n\n{}", lang.tr(text), lang.tr(Text::RequiresRoot)),
            invocation,
        }
    }

    fn status_lines<'a>(&self, ctx: &RenderContext) -> Vec<Line<'a>> {
        let lang = ctx.lang;
        let theme = ctx.theme;
        let flag = |value: bool| lang.tr(if value { Text::Yes } else { Text::No });

        let Some(status) = &self.status else {
            let message = self
                .error
                .clone()
                .unwrap_or_else(|| lang.tr(Text::StatusLoading).to_string());
            let style = if self.error.is_some() {
                theme.error()
            } else {
                theme.dim()
            };
            return vec![Line::from(Span::styled(message, style))];
        };

        let mut lines = Vec::new();
        if status.is_immutable() {
            let mut text = lang.tr(Text::StatusImmutable).to_string();
            if !status.booted {
                text.push_str(lang.tr(Text::StatusBootedImmutable));
            }
            lines.push(Line::from(Span::styled(text, theme.success())));
        } else {
            let mut text = lang.tr(Text::StatusWritable).to_string();
            if !status.booted {
                text.push_str(lang.tr(Text::StatusNotBootedWritable));
            }
            lines.push(Line::from(Span::styled(text, theme.error())));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            lang.tr(Text::ParamsGroup).to_string(),
            theme.title(),
        )));

        let params = [
            (Text::ParamWhitelist, status.whitelist.clone()),
            (Text::ParamClearAfterReboot, flag(status.clear_after_reboot).to_string()),
            (Text::ParamCleanData, flag(status.clean_data).to_string()),
            (Text::ParamOverlayDirs, status.overlay_dirs.clone()),
            (Text::ParamOverlayAllDirs, flag(status.overlay_all_dirs).to_string()),
        ];
        for (label, value) in params {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", lang.tr(label)), theme.dim()),
                Span::styled(if value.is_empty() { "-".to_string() } else { value }, theme.text()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            lang.tr(Text::StatusInfo).to_string(),
            theme.dim(),
        )));
        lines
    }
}

impl Panel for StatusPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Status
    }

    fn refresh_query(&self) -> Option<String> {
        Some(immutable::writable_status_query())
    }

    fn apply_refresh(&mut self, result: Result<CommandOutcome, String>) {
        match result {
            Ok(outcome) => match immutable::parse_writable_status(&outcome.output) {
                Some(status) => {
                    self.status = Some(status);
                    self.error = None;
                }
                None => {
                    tracing::warn!(
                        "Unexpected status output (exit {}): {}",
                        outcome.exit_code,
                        outcome.output.trim()
                    );
                    self.status = None;
                    self.error = Some(outcome.output.trim().to_string());
                }
            },
            Err(e) => {
                self.status = None;
                self.error = Some(e);
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, lang: Language) -> Option<Action> {
        match key {
            KeyCode::Enter | KeyCode::Char(' ') => {
                let action = ACTIONS[self.selected];
                if !self.action_enabled(action) {
                    return None;
                }
                match action {
                    Text::ActionDisableImmutable => Some(Self::confirm(
                        lang,
                        Text::ConfirmDisableImmutable,
                        immutable::disable_immutability(),
                    )),
                    Text::ActionEnableImmutable => Some(Self::confirm(
                        lang,
                        Text::ConfirmEnableImmutable,
                        immutable::enable_immutability(),
                    )),
                    _ => Some(Action::Refresh),
                }
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => {
                self.selected = step_selection(self.selected, ACTIONS.len(), key);
                None
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let lines = self.status_lines(ctx);
        let info_height = (lines.len() as u16 + 4).min(area.height.saturating_sub(5));
        let (info_area, actions_area) = panel_layout(area, info_height);

        let info = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(ctx.theme.border())
                    .title(Span::styled(
                        format!(" {} ", ctx.lang.tr(Text::StatusGroup)),
                        ctx.theme.title(),
                    )),
            );
        frame.render_widget(info, info_area);

        let items = ACTIONS
            .iter()
            .map(|&action| MenuItem::new(ctx.lang.tr(action), self.action_enabled(action)))
            .collect();
        let menu = MenuList::new(items, self.selected, ctx.theme).focused(ctx.focused);
        frame.render_widget(menu, actions_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::outcome::OutcomeClassifier;

    fn refreshed(output: &str) -> StatusPanel {
        let mut panel = StatusPanel::new();
        let outcome = OutcomeClassifier::default().classify(0, output, false);
        panel.apply_refresh(Ok(outcome));
        panel
    }

    #[test]
    fn test_queries_writable_status() {
        assert_eq!(
            StatusPanel::new().refresh_query().as_deref(),
            Some("deepin-immutable-writable status")
        );
    }

    #[test]
    fn test_toggles_disabled_until_loaded() {
        let mut panel = StatusPanel::new();
        assert!(panel.handle_key(KeyCode::Enter, Language::English).is_none());
        panel.handle_key(KeyCode::Down, Language::English);
        assert!(panel.handle_key(KeyCode::Enter, Language::English).is_none());
        panel.handle_key(KeyCode::Down, Language::English);
        assert_eq!(panel.handle_key(KeyCode::Enter, Language::English), Some(Action::Refresh));
    }

    #[test]
    fn test_immutable_system_offers_disable() {
        let mut panel = refreshed("Enable: false\nBooted: true");
        assert!(panel.status().unwrap().is_immutable());

        match panel.handle_key(KeyCode::Enter, Language::English) {
            Some(Action::Confirm { invocation, message }) => {
                assert_eq!(invocation, immutable::disable_immutability());
                assert!(message.ends_with(Language::English.tr(Text::RequiresRoot)));
            }
            other => panic!("unexpected {:?}", other),
        }

        panel.handle_key(KeyCode::Down, Language::English);
        assert!(panel.handle_key(KeyCode::Enter, Language::English).is_none());
    }

    #[test]
    fn test_writable_system_offers_enable() {
        let mut panel = refreshed("Enable: true\nBooted: true");
        assert!(panel.handle_key(KeyCode::Enter, Language::English).is_none());
        panel.handle_key(KeyCode::Down, Language::English);
        assert!(matches!(
            panel.handle_key(KeyCode::Enter, Language::English),
            Some(Action::Confirm { invocation, .. }) if invocation == immutable::enable_immutability()
        ));
    }

    #[test]
    fn test_query_error_clears_status() {
        let mut panel = refreshed("Enable: false");
        panel.apply_refresh(Err("Query failed: timed out".to_string()));
        assert!(panel.status().is_none());
        assert_eq!(panel.error.as_deref(), Some("Query failed: timed out"));
    }

    #[test]
    fn test_unparseable_output_is_shown() {
        let panel = refreshed("command not found");
        assert!(panel.status().is_none());
        assert_eq!(panel.error.as_deref(), Some("command not found"));
    }
}
