//! Color themes
//!
//! Two palettes, picked from the user's `ThemeChoice`. Styles are methods so
//! the whole UI switches at once when the theme is toggled.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeChoice;

/// Palette for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub text: Color,
    pub dim: Color,
    pub selected_fg: Color,
}

// deepin blue on dark, slate on light
const DARK: Theme = Theme {
    primary: Color::Rgb(0x00, 0x81, 0xFF),
    secondary: Color::Cyan,
    success: Color::Rgb(0x2E, 0xCC, 0x71),
    warning: Color::Yellow,
    error: Color::Rgb(0xE7, 0x4C, 0x3C),
    text: Color::White,
    dim: Color::DarkGray,
    selected_fg: Color::Black,
};

const LIGHT: Theme = Theme {
    primary: Color::Rgb(0x00, 0x5C, 0xC5),
    secondary: Color::Blue,
    success: Color::Rgb(0x1E, 0x84, 0x49),
    warning: Color::Rgb(0xB9, 0x77, 0x0E),
    error: Color::Rgb(0xC0, 0x39, 0x2B),
    text: Color::Black,
    dim: Color::Gray,
    selected_fg: Color::White,
};

impl Default for Theme {
    fn default() -> Self {
        DARK
    }
}

impl From<ThemeChoice> for Theme {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => DARK,
            ThemeChoice::Light => LIGHT,
        }
    }
}

impl Theme {
    /// Title style (headers)
    pub fn title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    /// Normal text
    pub fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Dimmed/inactive text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Selected/highlighted item
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    /// Active border (focused)
    pub fn border_active(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn key_hint(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn info(&self) -> Style {
        Style::default().fg(self.secondary)
    }
}
