//! Deployment administration: deploy, finalize, rollback, exec, file-op

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{step_selection, Action, Panel, PanelKind, RenderContext};
use crate::app::state::FormState;
use crate::commands::immutable::{self, DeployOptions};
use crate::i18n::{Language, Text};
use crate::ui::layout::panel_layout;
use crate::ui::widgets::{MenuItem, MenuList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Deploy,
    OptBackup,
    OptRefresh,
    OptAppend,
    Finalize,
    Rollback,
    Exec,
    FileOp,
}

const ENTRIES: [Entry; 8] = [
    Entry::Deploy,
    Entry::OptBackup,
    Entry::OptRefresh,
    Entry::OptAppend,
    Entry::Finalize,
    Entry::Rollback,
    Entry::Exec,
    Entry::FileOp,
];

#[derive(Debug, Default)]
pub struct AdminPanel {
    options: DeployOptions,
    selected: usize,
}

impl AdminPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn label(&self, entry: Entry, lang: Language) -> String {
        let check = |on: bool| if on { "[x]" } else { "[ ]" };
        match entry {
            Entry::Deploy => lang.tr(Text::AdminDeploy).to_string(),
            Entry::OptBackup => format!("  {} {}", check(self.options.backup), lang.tr(Text::DeployOptBackup)),
            Entry::OptRefresh => format!("  {} {}", check(self.options.refresh), lang.tr(Text::DeployOptRefresh)),
            Entry::OptAppend => format!("  {} {}", check(self.options.append), lang.tr(Text::DeployOptAppend)),
            Entry::Finalize => lang.tr(Text::AdminFinalize).to_string(),
            Entry::Rollback => lang.tr(Text::AdminRollback).to_string(),
            Entry::Exec => lang.tr(Text::AdminExec).to_string(),
            Entry::FileOp => lang.tr(Text::AdminFileOp).to_string(),
        }
    }

    fn activate(&mut self, entry: Entry, lang: Language) -> Option<Action> {
        match entry {
            Entry::Deploy => {
                let invocation = immutable::deploy(self.options);
                Some(Action::Confirm {
                    message: lang.fmt(Text::ConfirmDeploy, &invocation.command),
                    invocation,
                })
            }
            Entry::OptBackup => {
                self.options.backup = !self.options.backup;
                None
            }
            Entry::OptRefresh => {
                self.options.refresh = !self.options.refresh;
                None
            }
            Entry::OptAppend => {
                self.options.append = !self.options.append;
                None
            }
            Entry::Finalize => Some(Action::Confirm {
                message: lang.tr(Text::ConfirmFinalize).to_string(),
                invocation: immutable::finalize(),
            }),
            Entry::Rollback => Some(Action::Confirm {
                message: lang.tr(Text::ConfirmRollback).to_string(),
                invocation: immutable::rollback(),
            }),
            Entry::Exec => Some(Action::OpenForm(FormState::exec())),
            Entry::FileOp => Some(Action::OpenForm(FormState::file_op())),
        }
    }
}

impl Panel for AdminPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Admin
    }

    fn handle_key(&mut self, key: KeyCode, lang: Language) -> Option<Action> {
        match key {
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(ENTRIES[self.selected], lang),
            _ => {
                self.selected = step_selection(self.selected, ENTRIES.len(), key);
                None
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let (info_area, actions_area) = panel_layout(area, 4);

        let flags = self.options.flags();
        let summary = if flags.is_empty() {
            "-".to_string()
        } else {
            flags.join(" ")
        };
        let info = Paragraph::new(vec![Line::from(vec![
            Span::styled(format!("{}: ", ctx.lang.tr(Text::DeployOptions)), ctx.theme.dim()),
            Span::styled(summary, ctx.theme.text()),
        ])])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ctx.theme.border())
                .title(Span::styled(
                    format!(" {} ", ctx.lang.tr(Text::PanelAdmin)),
                    ctx.theme.title(),
                )),
        );
        frame.render_widget(info, info_area);

        let labels: Vec<String> = ENTRIES.iter().map(|&e| self.label(e, ctx.lang)).collect();
        let items = labels.iter().map(|l| MenuItem::new(l, true)).collect();
        let menu = MenuList::new(items, self.selected, ctx.theme).focused(ctx.focused);
        frame.render_widget(menu, actions_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(panel: &mut AdminPanel, entry: Entry) {
        panel.selected = ENTRIES.iter().position(|&e| e == entry).unwrap();
    }

    #[test]
    fn test_deploy_uses_toggled_options() {
        let mut panel = AdminPanel::new();
        select(&mut panel, Entry::OptBackup);
        assert!(panel.handle_key(KeyCode::Char(' '), Language::English).is_none());
        select(&mut panel, Entry::OptRefresh);
        panel.handle_key(KeyCode::Enter, Language::English);
        panel.handle_key(KeyCode::Enter, Language::English);

        select(&mut panel, Entry::Deploy);
        match panel.handle_key(KeyCode::Enter, Language::English) {
            Some(Action::Confirm { invocation, message }) => {
                assert_eq!(
                    invocation.command,
                    "pkexec deepin-immutable-ctl admin deploy --backup"
                );
                assert!(message.contains(&invocation.command));
                assert!(!invocation.requires_reboot);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_finalize_and_rollback_require_reboot() {
        let mut panel = AdminPanel::new();
        for entry in [Entry::Finalize, Entry::Rollback] {
            select(&mut panel, entry);
            match panel.handle_key(KeyCode::Enter, Language::Spanish) {
                Some(Action::Confirm { invocation, .. }) => assert!(invocation.requires_reboot),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_exec_and_file_op_open_forms() {
        let mut panel = AdminPanel::new();
        select(&mut panel, Entry::Exec);
        assert_eq!(
            panel.handle_key(KeyCode::Enter, Language::English),
            Some(Action::OpenForm(FormState::exec()))
        );
        panel.handle_key(KeyCode::Down, Language::English);
        assert_eq!(
            panel.handle_key(KeyCode::Enter, Language::English),
            Some(Action::OpenForm(FormState::file_op()))
        );
    }

    #[test]
    fn test_option_labels_show_state() {
        let mut panel = AdminPanel::new();
        assert!(panel.label(Entry::OptAppend, Language::English).contains("[ ]"));
        panel.options.append = true;
        assert!(panel.label(Entry::OptAppend, Language::English).contains("[x]"));
    }
}
