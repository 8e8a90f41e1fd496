//! Popups drawn over the panels: confirmations, forms, notices and the console

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::state::FormState;
use crate::app::ConsoleState;
use crate::commands::outcome::Affordance;
use crate::constants::COMMON_EXEC_COMMANDS;
use crate::i18n::{Language, Text};
use crate::ui::layout::{centered_fixed, centered_rect};
use crate::ui::theme::Theme;
use crate::ui::widgets::{LogView, Spinner};

/// `[key] label` pairs for a hint line
fn key_hints<'a>(hints: &[(&'a str, &'a str)], theme: &Theme) -> Line<'a> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, label)) in hints.iter().enumerate() {
        let open = if i == 0 { "[" } else { "  [" };
        spans.push(Span::styled(open, theme.dim()));
        spans.push(Span::styled(*key, theme.key_hint()));
        spans.push(Span::styled(format!("] {}", label), theme.dim()));
    }
    Line::from(spans)
}

fn popup_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_active())
        .title(Span::styled(format!(" {} ", title), theme.title()))
}

pub fn draw_exit_confirm(frame: &mut Frame, theme: &Theme, lang: Language) {
    let popup_area = centered_fixed(44, 7, frame.area());
    frame.render_widget(Clear, popup_area);

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(lang.tr(Text::ExitConfirm), theme.text())),
        Line::from(""),
        key_hints(
            &[("Enter/Y", lang.tr(Text::KeyYes)), ("Esc/N", lang.tr(Text::KeyNo))],
            theme,
        ),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.warning())
            .title(Span::styled(format!(" {} ", lang.tr(Text::KeyQuit)), theme.warning())),
    );
    frame.render_widget(content, popup_area);
}

pub fn draw_confirm(
    frame: &mut Frame,
    message: &str,
    yes_selected: bool,
    theme: &Theme,
    lang: Language,
) {
    let width = 64.min(frame.area().width);
    // Rough wrap estimate for the height
    let inner = width.saturating_sub(4).max(1) as usize;
    let text_rows: usize = message
        .lines()
        .map(|l| l.chars().count().max(1).div_ceil(inner))
        .sum();
    let height = (text_rows as u16 + 6).min(frame.area().height);
    let popup_area = centered_fixed(width, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let button = |label: &'static str, on: bool| {
        let style = if on { theme.selected() } else { theme.dim() };
        Span::styled(format!(" {} ", label), style)
    };

    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(
        message
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), theme.text()))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        button(lang.tr(Text::KeyYes), yes_selected),
        Span::raw("    "),
        button(lang.tr(Text::KeyNo), !yes_selected),
    ]));
    lines.push(key_hints(
        &[("←/→", lang.tr(Text::KeySelect)), ("Y/N", lang.tr(Text::ConfirmTitle))],
        theme,
    ));

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(popup_block(lang.tr(Text::ConfirmTitle), theme));
    frame.render_widget(content, popup_area);
}

pub fn draw_notice(frame: &mut Frame, message: &str, theme: &Theme, lang: Language) {
    let popup_area = centered_fixed(56, 8, frame.area());
    frame.render_widget(Clear, popup_area);

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), theme.text())),
        Line::from(""),
        key_hints(&[("Enter", lang.tr(Text::KeyClose))], theme),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(popup_block(lang.tr(Text::ConfirmTitle), theme));
    frame.render_widget(content, popup_area);
}

pub fn draw_form(frame: &mut Frame, form: &FormState, theme: &Theme, lang: Language) {
    let preset_rows = if form.has_presets() {
        COMMON_EXEC_COMMANDS.len() as u16 + 2
    } else {
        0
    };
    let height = 6 + form.fields.len() as u16 * 3 + preset_rows;
    let popup_area = centered_fixed(64, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(lang.tr(form.title()), theme);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut constraints: Vec<Constraint> =
        form.fields.iter().map(|_| Constraint::Length(3)).collect();
    if preset_rows > 0 {
        constraints.push(Constraint::Length(preset_rows));
    }
    constraints.push(Constraint::Length(1)); // error
    constraints.push(Constraint::Min(1)); // hints
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in form.fields.iter().enumerate() {
        let active = i == form.active;
        let mut spans = vec![Span::styled(field.value.clone(), theme.text())];
        if active {
            spans.push(Span::styled("█", theme.key_hint()));
        }
        let input = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if active {
                    theme.border_active()
                } else {
                    theme.border()
                })
                .title(Span::styled(
                    format!(" {} ", lang.tr(field.label)),
                    if active { theme.title() } else { theme.dim() },
                )),
        );
        frame.render_widget(input, chunks[i]);
    }

    let mut next = form.fields.len();
    if preset_rows > 0 {
        let mut lines = vec![Line::from(Span::styled(
            format!("{} (↑/↓):", lang.tr(Text::FormPresets)),
            theme.dim(),
        ))];
        for (i, (label, command)) in COMMON_EXEC_COMMANDS.iter().enumerate() {
            let style = if form.preset == Some(i) {
                theme.selected()
            } else {
                theme.text()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<28}", label), style),
                Span::styled(*command, theme.dim()),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), chunks[next]);
        next += 1;
    }

    if let Some(error) = &form.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), theme.error())),
            chunks[next],
        );
    }

    let hints = key_hints(
        &[
            ("Enter", lang.tr(Text::KeySubmit)),
            ("Tab", lang.tr(Text::KeyNextField)),
            ("Esc", lang.tr(Text::KeyCancel)),
        ],
        theme,
    );
    frame.render_widget(
        Paragraph::new(hints).alignment(Alignment::Center),
        chunks[next + 1],
    );
}

/// Full console overlay with the running command's output
pub fn draw_console(
    frame: &mut Frame,
    console: &ConsoleState,
    spinner_state: usize,
    theme: &Theme,
    lang: Language,
) {
    let area = centered_rect(90, 85, frame.area());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status
            Constraint::Min(3),    // Output
            Constraint::Length(1), // Hints
        ])
        .split(area);

    let status = if console.is_running() {
        let spinner = Spinner::new(spinner_state, theme.info());
        Line::from(vec![
            Span::styled(format!(" {} ", spinner.char()), theme.info()),
            Span::styled(lang.tr(Text::ConsoleRunning), theme.info()),
            Span::styled(format!("  {}", console.command), theme.dim()),
        ])
    } else {
        let style = match console.outcome() {
            Some(o) if o.is_successful() => theme.success(),
            Some(o) if o.user_cancelled => theme.warning(),
            _ => theme.error(),
        };
        Line::from(Span::styled(format!(" {}", console.command), style))
    };
    frame.render_widget(Paragraph::new(status), chunks[0]);

    let lines = console.lines();
    let log = LogView::new(&lines, theme)
        .title(&console.title)
        .scroll_offset(console.scroll_offset);
    frame.render_widget(log, chunks[1]);

    let hints = match console.affordance() {
        None => key_hints(
            &[("↑/↓", lang.tr(Text::KeyNavigate)), ("C/Esc", lang.tr(Text::KeyCancel))],
            theme,
        ),
        Some(Affordance::RebootPrompt) => key_hints(
            &[
                ("R/Enter", lang.tr(Text::KeyRebootNow)),
                ("L/Esc", lang.tr(Text::KeyRebootLater)),
            ],
            theme,
        ),
        Some(Affordance::Close) => key_hints(
            &[("↑/↓", lang.tr(Text::KeyNavigate)), ("Enter/Esc", lang.tr(Text::KeyClose))],
            theme,
        ),
    };
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), chunks[2]);
}
