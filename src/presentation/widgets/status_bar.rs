//! Footer line shown under every page.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Status severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Progress or neutral information.
    Info,
    /// Completed action.
    Success,
    /// Failed action.
    Error,
}

impl StatusLevel {
    /// Returns color for level.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Error => Color::Red,
        }
    }
}

/// Transient status text with its severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Text shown in the footer.
    pub text: String,
    /// Severity.
    pub level: StatusLevel,
}

impl StatusMessage {
    /// Creates info status.
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Info,
        }
    }

    /// Creates success status.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Success,
        }
    }

    /// Creates error status.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Error,
        }
    }
}

/// Footer with help on the left, status in the middle and the terminal size
/// on the right.
#[derive(Debug, Clone, Default)]
pub struct StatusBar<'a> {
    help: &'a str,
    status: Option<&'a StatusMessage>,
    size: Option<(u16, u16)>,
}

impl<'a> StatusBar<'a> {
    /// Creates empty footer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            help: "",
            status: None,
            size: None,
        }
    }

    /// Sets help text.
    #[must_use]
    pub const fn help(mut self, help: &'a str) -> Self {
        self.help = help;
        self
    }

    /// Sets status message.
    #[must_use]
    pub const fn status(mut self, status: Option<&'a StatusMessage>) -> Self {
        self.status = status;
        self
    }

    /// Sets terminal dimensions.
    #[must_use]
    pub const fn size(mut self, width: u16, height: u16) -> Self {
        self.size = Some((width, height));
        self
    }

    fn size_text(&self) -> String {
        self.size
            .map(|(width, height)| format!("{width}x{height}"))
            .unwrap_or_default()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = area.width as usize;
        let right = self.size_text();
        let (center, center_style) = self.status.map_or_else(
            || (String::new(), Style::default()),
            |status| {
                (
                    status.text.clone(),
                    Style::default()
                        .fg(status.level.color())
                        .add_modifier(Modifier::BOLD),
                )
            },
        );

        let left_width = self.help.width();
        let center_width = center.width();
        let center_start = width.saturating_sub(center_width) / 2;
        let left_padding = center_start.saturating_sub(left_width).max(1);
        let used = left_width + left_padding + center_width;
        let right_padding = width.saturating_sub(used + right.width()).max(1);

        let line = Line::from(vec![
            Span::styled(self.help, Style::default().fg(Color::DarkGray)),
            Span::raw(" ".repeat(left_padding)),
            Span::styled(center, center_style),
            Span::raw(" ".repeat(right_padding)),
            Span::styled(right, Style::default().fg(Color::Gray)),
        ]);

        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_footer_shows_all_sections() {
        let status = StatusMessage::error("login failed");
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);

        StatusBar::new()
            .help("tab: switch")
            .status(Some(&status))
            .size(80, 24)
            .render(area, &mut buf);

        let text = line_text(&buf);
        assert!(text.starts_with("tab: switch"));
        assert!(text.contains("login failed"));
        assert!(text.trim_end().ends_with("80x24"));
    }

    #[test]
    fn test_status_uses_level_color() {
        let status = StatusMessage::success("ok");
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);

        StatusBar::new().status(Some(&status)).render(area, &mut buf);

        let x = (0..area.width)
            .find(|&x| buf[(x, 0)].symbol() == "o")
            .unwrap();
        assert_eq!(buf[(x, 0)].fg, Color::Green);
    }
}
