//! Progress spinner.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner advanced once per tick.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    /// Advances one frame.
    pub fn advance(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    /// Returns current frame glyph.
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        FRAMES[self.frame]
    }

    /// Builds a widget that draws the spinner followed by `label`.
    #[must_use]
    pub fn with_label<'a>(&self, label: &'a str) -> SpinnerLine<'a> {
        SpinnerLine {
            glyph: self.glyph(),
            label,
        }
    }
}

/// Spinner glyph and label on one centered line.
pub struct SpinnerLine<'a> {
    glyph: &'static str,
    label: &'a str,
}

impl Widget for SpinnerLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(self.glyph, Style::default().fg(Color::Cyan)),
            Span::raw(" "),
            Span::raw(self.label),
        ])
        .centered();
        Paragraph::new(line).render(area, buf);
    }
}
