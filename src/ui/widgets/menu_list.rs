//! Selectable action list widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::ui::theme::Theme;

/// One entry; disabled entries are drawn dimmed
pub struct MenuItem<'a> {
    pub label: &'a str,
    pub enabled: bool,
}

impl<'a> MenuItem<'a> {
    pub fn new(label: &'a str, enabled: bool) -> Self {
        Self { label, enabled }
    }
}

pub struct MenuList<'a> {
    items: Vec<MenuItem<'a>>,
    selected: usize,
    focused: bool,
    theme: &'a Theme,
    title: Option<&'a str>,
}

impl<'a> MenuList<'a> {
    pub fn new(items: Vec<MenuItem<'a>>, selected: usize, theme: &'a Theme) -> Self {
        // Clamp selected index to valid range to prevent out-of-bounds access
        let selected = selected.min(items.len().saturating_sub(1));

        Self {
            items,
            selected,
            focused: true,
            theme,
            title: None,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Unfocused lists don't highlight their selection
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for MenuList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let is_selected = self.focused && i == self.selected;
                let prefix = if is_selected { "> " } else { "  " };
                let style = match (is_selected, item.enabled) {
                    (true, true) => self.theme.selected(),
                    (true, false) => self.theme.dim().add_modifier(ratatui::style::Modifier::REVERSED),
                    (false, true) => self.theme.text(),
                    (false, false) => self.theme.dim(),
                };
                ListItem::new(Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(item.label, style),
                ]))
            })
            .collect();

        let mut block = Block::default().borders(Borders::ALL).border_style(if self.focused {
            self.theme.border_active()
        } else {
            self.theme.border()
        });

        if let Some(title) = self.title {
            block = block.title(Span::styled(format!(" {} ", title), self.theme.title()));
        }

        let list = List::new(items).block(block);

        // Use StatefulWidget so long lists scroll to the selection
        let mut state = ListState::default().with_selected(Some(self.selected));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}
