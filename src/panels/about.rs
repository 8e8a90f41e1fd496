//! About panel

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{Action, Panel, PanelKind, RenderContext};
use crate::constants::{APP_NAME, APP_VERSION};
use crate::i18n::{Language, Text};

const MAINTAINERS: &[&str] = &["krafairus - https://xn--deepinenespaol-1nb.org/participant/krafairus"];

const COMMUNITY_URL: &str = "https://xn--deepinenespaol-1nb.org";

const REPOSITORY_URL: &str = "https://github.com/krafairus/immutable-deepin-tools";

#[derive(Debug, Default)]
pub struct AboutPanel;

impl AboutPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for AboutPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::About
    }

    fn handle_key(&mut self, _key: KeyCode, _lang: Language) -> Option<Action> {
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        let lang = ctx.lang;
        let theme = ctx.theme;

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(APP_NAME, theme.title())),
            Line::from(Span::styled(lang.fmt(Text::AboutVersion, APP_VERSION), theme.info())),
            Line::from(""),
            Line::from(Span::styled(lang.tr(Text::AboutSubtitle), theme.text())),
            Line::from(""),
            Line::from(Span::styled(lang.tr(Text::AboutMaintainers), theme.title())),
        ];
        lines.extend(
            MAINTAINERS
                .iter()
                .map(|name| Line::from(Span::styled(*name, theme.text()))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", lang.tr(Text::AboutCommunity)), theme.dim()),
            Span::styled(COMMUNITY_URL, theme.key_hint()),
        ]));
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", lang.tr(Text::AboutRepository)), theme.dim()),
            Span::styled(REPOSITORY_URL, theme.key_hint()),
        ]));

        let about = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(if ctx.focused {
                        theme.border_active()
                    } else {
                        theme.border()
                    })
                    .title(Span::styled(
                        format!(" {} ", lang.tr(Text::PanelAbout)),
                        theme.title(),
                    )),
            );
        frame.render_widget(about, area);
    }
}
