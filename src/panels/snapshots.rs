//! Snapshot list and snapshot actions

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{step_selection, Action, Panel, PanelKind, RenderContext};
use crate::app::state::FormState;
use crate::commands::immutable::{self, SnapshotEntry};
use crate::commands::outcome::CommandOutcome;
use crate::i18n::{Language, Text};
use crate::ui::widgets::{MenuItem, MenuList};

/// Hotkey, label and whether the action needs a selected snapshot
const ACTIONS: [(char, Text, bool); 6] = [
    ('n', Text::SnapCreate, false),
    ('s', Text::SnapShow, true),
    ('m', Text::SnapModify, true),
    ('d', Text::SnapDelete, true),
    ('v', Text::SnapRevert, true),
    ('r', Text::ActionRefresh, false),
];

#[derive(Debug, Default)]
pub struct SnapshotsPanel {
    entries: Vec<SnapshotEntry>,
    selected: Option<usize>,
    error: Option<String>,
}

impl SnapshotsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_entry(&self) -> Option<&SnapshotEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    fn run_action(&self, hotkey: char, lang: Language) -> Option<Action> {
        if hotkey == 'n' {
            return Some(Action::OpenForm(FormState::create_snapshot()));
        }
        if hotkey == 'r' {
            return Some(Action::Refresh);
        }

        let id = self.selected_entry()?.id.clone();
        match hotkey {
            's' => Some(Action::Run(immutable::snapshot_show(&id))),
            'm' => Some(Action::OpenForm(FormState::modify_snapshot(id))),
            'd' => Some(Action::Confirm {
                message: lang.fmt(Text::ConfirmDeleteSnapshot, &id),
                invocation: immutable::snapshot_delete(&id),
            }),
            'v' => Some(Action::Confirm {
                message: format!(
                    "{}\n\n{}",
                    lang.fmt(Text::ConfirmRevertSnapshot, &id),
                    lang.tr(Text::SnapRevertInfo)
                ),
                invocation: immutable::snapshot_rollback(&id),
            }),
            _ => None,
        }
    }
}

fn entry_label(entry: &SnapshotEntry) -> String {
    let mut label = format!("{} ({})  {}", entry.name, entry.id, entry.created_display());
    if !entry.description.is_empty() {
        label.push_str(" - ");
        label.push_str(&entry.description);
    }
    label
}

impl Panel for SnapshotsPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Snapshots
    }

    fn refresh_query(&self) -> Option<String> {
        Some(immutable::snapshot_list_query())
    }

    fn apply_refresh(&mut self, result: Result<CommandOutcome, String>) {
        let previous = self.selected_entry().map(|e| e.id.clone());

        match result {
            Ok(outcome) => {
                self.entries = immutable::parse_snapshot_list(&outcome.output);
                self.error = (!outcome.is_successful()).then(|| outcome.output.trim().to_string());
            }
            Err(e) => {
                self.entries.clear();
                self.error = Some(e);
            }
        }

        // Keep the same snapshot selected across refreshes when it still exists
        self.selected = previous
            .and_then(|id| self.entries.iter().position(|e| e.id == id))
            .or_else(|| (!self.entries.is_empty()).then_some(0));
        tracing::debug!("Loaded {} snapshots", self.entries.len());
    }

    fn handle_key(&mut self, key: KeyCode, lang: Language) -> Option<Action> {
        match key {
            KeyCode::Enter => self.run_action('s', lang),
            KeyCode::Char(c) if ACTIONS.iter().any(|(hotkey, ..)| *hotkey == c) => {
                self.run_action(c, lang)
            }
            _ => {
                if let Some(selected) = self.selected {
                    self.selected = Some(step_selection(selected, self.entries.len(), key));
                }
                None
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        let title = ctx.lang.tr(Text::SnapshotsGroup);
        if self.entries.is_empty() {
            let (message, style) = match &self.error {
                Some(error) => (error.clone(), ctx.theme.error()),
                None => (ctx.lang.tr(Text::SnapshotsEmpty).to_string(), ctx.theme.dim()),
            };
            let empty = Paragraph::new(Line::from(Span::styled(message, style)))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(ctx.theme.border())
                        .title(Span::styled(format!(" {} ", title), ctx.theme.title())),
                );
            frame.render_widget(empty, chunks[0]);
        } else {
            let labels: Vec<String> = self.entries.iter().map(entry_label).collect();
            let items = labels.iter().map(|l| MenuItem::new(l, true)).collect();
            let list = MenuList::new(items, self.selected.unwrap_or(0), ctx.theme)
                .title(title)
                .focused(ctx.focused);
            frame.render_widget(list, chunks[0]);
        }

        let has_selection = self.selected_entry().is_some();
        let mut lines: Vec<Line> = ACTIONS
            .iter()
            .map(|(hotkey, text, needs_selection)| {
                let enabled = !needs_selection || has_selection;
                let style = if enabled { ctx.theme.text() } else { ctx.theme.dim() };
                Line::from(vec![
                    Span::styled("[", ctx.theme.dim()),
                    Span::styled(hotkey.to_string(), ctx.theme.key_hint()),
                    Span::styled("] ", ctx.theme.dim()),
                    Span::styled(ctx.lang.tr(*text), style),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            ctx.lang.tr(Text::SnapRevertInfo),
            ctx.theme.dim(),
        )));

        let actions = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ctx.theme.border()),
        );
        frame.render_widget(actions, chunks[1]);
    }
}
