//! UI rendering module

mod dialogs;
pub mod layout;
pub mod theme;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Dialog, Focus};
use crate::config::ThemeChoice;
use crate::constants::{APP_NAME, APP_VERSION};
use crate::i18n::{Language, Text};
use crate::panels::RenderContext;
use theme::Theme;
use widgets::{MenuItem, MenuList};

/// Main draw function: header, navigation, active panel, then overlays
pub fn draw(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let lang = app.lang();
    let (header, body, footer) = layout::main_layout(frame.area());
    let (nav_area, panel_area) = layout::body_layout(body);

    draw_header(frame, header, app);
    draw_nav(frame, nav_area, app);

    if let Some(panel) = app.panels.get(app.active_panel) {
        let ctx = RenderContext {
            theme,
            lang,
            focused: app.focus == Focus::Panel,
        };
        panel.render(frame, panel_area, &ctx);
    }

    draw_footer(frame, footer, theme, lang);

    match &app.dialog {
        Some(Dialog::Confirm {
            message,
            yes_selected,
            ..
        }) => dialogs::draw_confirm(frame, message, *yes_selected, theme, lang),
        Some(Dialog::Form(form)) => dialogs::draw_form(frame, form, theme, lang),
        Some(Dialog::Notice(message)) => dialogs::draw_notice(frame, message, theme, lang),
        Some(Dialog::ExitConfirm) => dialogs::draw_exit_confirm(frame, theme, lang),
        None => {}
    }

    // Console covers everything else while it is open
    if let Some(console) = &app.console {
        dialogs::draw_console(frame, console, app.spinner_state, theme, lang);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let theme_name = match app.settings.theme {
        ThemeChoice::Dark => "dark",
        ThemeChoice::Light => "light",
    };
    let lang_name = match app.lang() {
        Language::Spanish => "es",
        Language::English => "en",
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(APP_NAME, theme.title()),
        Span::styled(format!("  v{}", APP_VERSION), theme.dim()),
        Span::styled(format!("   {} | {}", theme_name, lang_name), theme.info()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border()),
    );
    frame.render_widget(header, area);
}

fn draw_nav(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.lang();
    let titles: Vec<String> = app
        .panels
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {}", i + 1, p.title(lang)))
        .collect();
    let items = titles.iter().map(|t| MenuItem::new(t, true)).collect();
    let nav = MenuList::new(items, app.active_panel, &app.theme).focused(app.focus == Focus::Nav);
    frame.render_widget(nav, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, theme: &Theme, lang: Language) {
    let hints = [
        ("↑/↓", lang.tr(Text::KeyNavigate)),
        ("Enter", lang.tr(Text::KeySelect)),
        ("Tab/1-4", lang.tr(Text::KeyPanels)),
        ("t", lang.tr(Text::KeyTheme)),
        ("L", lang.tr(Text::KeyLanguage)),
        ("q", lang.tr(Text::KeyQuit)),
    ];
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled("[", theme.dim()));
        spans.push(Span::styled(key, theme.key_hint()));
        spans.push(Span::styled(format!("] {}  ", label), theme.dim()));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
