//! Panels shown in the main window
//!
//! Each panel is a thin view over the command layer: it may name a query to
//! refresh its data, parses the captured output, and turns keys into
//! `Action`s that the `App` carries out (confirm, run, open a form).

mod about;
mod admin;
mod snapshots;
mod status;

pub use about::AboutPanel;
pub use admin::AdminPanel;
pub use snapshots::SnapshotsPanel;
pub use status::StatusPanel;

use crossterm::event::KeyCode;
use ratatui::{layout::Rect, Frame};

use crate::app::state::FormState;
use crate::commands::immutable::RefreshTarget;
use crate::commands::outcome::CommandOutcome;
use crate::commands::CommandInvocation;
use crate::i18n::{Language, Text};
use crate::ui::theme::Theme;

/// Fixed set of panels, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Status,
    Admin,
    Snapshots,
    About,
}

impl PanelKind {
    pub const ALL: [PanelKind; 4] = [
        PanelKind::Status,
        PanelKind::Admin,
        PanelKind::Snapshots,
        PanelKind::About,
    ];

    pub fn title(self) -> Text {
        match self {
            PanelKind::Status => Text::PanelStatus,
            PanelKind::Admin => Text::PanelAdmin,
            PanelKind::Snapshots => Text::PanelSnapshots,
            PanelKind::About => Text::PanelAbout,
        }
    }

    /// Panel that shows the data a refresh target reloads
    pub fn for_target(target: RefreshTarget) -> Self {
        match target {
            RefreshTarget::Status => PanelKind::Status,
            RefreshTarget::Snapshots => PanelKind::Snapshots,
        }
    }
}

/// What a panel asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Ask Yes/No, then run in the console
    Confirm {
        message: String,
        invocation: CommandInvocation,
    },
    /// Run in the console without asking
    Run(CommandInvocation),
    OpenForm(FormState),
    /// Show a message without running anything
    Notice(String),
    /// Reload this panel's data
    Refresh,
}

/// Shared drawing inputs
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub lang: Language,
    /// Panel has keyboard focus
    pub focused: bool,
}

pub trait Panel {
    fn kind(&self) -> PanelKind;

    fn title(&self, lang: Language) -> &'static str {
        lang.tr(self.kind().title())
    }

    /// Read-only command whose captured output feeds `apply_refresh`
    fn refresh_query(&self) -> Option<String> {
        None
    }

    /// Captured output of `refresh_query`, or a localized error
    fn apply_refresh(&mut self, _result: Result<CommandOutcome, String>) {}

    fn handle_key(&mut self, key: KeyCode, lang: Language) -> Option<Action>;

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext);
}

/// All panels in navigation order
pub fn all_panels() -> Vec<Box<dyn Panel>> {
    PanelKind::ALL
        .iter()
        .map(|kind| -> Box<dyn Panel> {
            match kind {
                PanelKind::Status => Box::new(StatusPanel::new()),
                PanelKind::Admin => Box::new(AdminPanel::new()),
                PanelKind::Snapshots => Box::new(SnapshotsPanel::new()),
                PanelKind::About => Box::new(AboutPanel::new()),
            }
        })
        .collect()
}

/// Move a list selection by one, clamped to `len`
pub(crate) fn step_selection(selected: usize, len: usize, key: KeyCode) -> usize {
    match key {
        KeyCode::Up | KeyCode::Char('k') => selected.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => (selected + 1).min(len.saturating_sub(1)),
        KeyCode::Home => 0,
        KeyCode::End => len.saturating_sub(1),
        _ => selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panels_follow_navigation_order() {
        let panels = all_panels();
        let kinds: Vec<PanelKind> = panels.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, PanelKind::ALL.to_vec());
    }

    #[test]
    fn test_refresh_targets_map_to_panels() {
        assert_eq!(PanelKind::for_target(RefreshTarget::Status), PanelKind::Status);
        assert_eq!(
            PanelKind::for_target(RefreshTarget::Snapshots),
            PanelKind::Snapshots
        );
    }

    #[test]
    fn test_step_selection_clamps() {
        assert_eq!(step_selection(0, 3, KeyCode::Up), 0);
        assert_eq!(step_selection(2, 3, KeyCode::Down), 2);
        assert_eq!(step_selection(1, 3, KeyCode::Char('j')), 2);
        assert_eq!(step_selection(0, 0, KeyCode::Down), 0);
        assert_eq!(step_selection(0, 5, KeyCode::End), 4);
    }
}
