//! Animated spinner widget

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// Braille spinner characters
const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct Spinner {
    state: usize,
    style: Style,
}

impl Spinner {
    pub fn new(state: usize, style: Style) -> Self {
        Self { state, style }
    }

    pub fn char(&self) -> char {
        SPINNER_CHARS[self.state % SPINNER_CHARS.len()]
    }

    /// Number of animation frames
    pub fn frames() -> usize {
        SPINNER_CHARS.len()
    }
}

impl Widget for Spinner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 1 || area.height < 1 {
            return;
        }
        buf.set_string(area.x, area.y, self.char().to_string(), self.style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_wraps() {
        let frames = Spinner::frames();
        assert_eq!(
            Spinner::new(0, Style::default()).char(),
            Spinner::new(frames, Style::default()).char()
        );
    }
}
