//! Scrollable console output widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::constants::{CANCEL_MARKER, STDERR_PREFIX};
use crate::ui::theme::Theme;

pub struct LogView<'a> {
    lines: &'a [String],
    theme: &'a Theme,
    title: Option<&'a str>,
    scroll_offset: Option<usize>,
}

impl<'a> LogView<'a> {
    pub fn new(lines: &'a [String], theme: &'a Theme) -> Self {
        Self {
            lines,
            theme,
            title: None,
            scroll_offset: None,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Set a manual scroll offset (None follows the tail)
    pub fn scroll_offset(mut self, offset: Option<usize>) -> Self {
        self.scroll_offset = offset;
        self
    }

    fn line_style(&self, line: &str) -> Style {
        if line.starts_with(STDERR_PREFIX) || line.starts_with('❌') || line.starts_with('🔒') {
            self.theme.error()
        } else if line.starts_with(CANCEL_MARKER) || line.starts_with('⚠') || line.starts_with('⛔') {
            self.theme.warning()
        } else if line.starts_with('✅') || line.starts_with('🔄') {
            self.theme.success()
        } else if line.starts_with("$ ") {
            self.theme.info()
        } else if line.starts_with("====") {
            self.theme.dim()
        } else {
            self.theme.text()
        }
    }
}

/// First visible line for a view of `height` rows
pub fn visible_start(total: usize, height: usize, scroll_offset: Option<usize>) -> usize {
    match scroll_offset {
        Some(offset) => offset.min(total.saturating_sub(1)),
        None if total > height && height > 0 => total - height,
        None => 0,
    }
}

impl Widget for LogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());

        if let Some(title) = self.title {
            block = block.title(Span::styled(format!(" {} ", title), self.theme.title()));
        }

        // Account for borders
        let inner_height = area.height.saturating_sub(2) as usize;
        let start = visible_start(self.lines.len(), inner_height, self.scroll_offset);
        let end = (start + inner_height).min(self.lines.len());

        let visible_lines: Vec<Line> = self.lines[start..end]
            .iter()
            .map(|line| Line::from(Span::styled(line.as_str(), self.line_style(line))))
            .collect();

        Paragraph::new(visible_lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
