//! Single-line form field.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;
use zeroize::Zeroize;

const MASK: char = '•';

/// Editable text field. `caret` counts chars, not bytes.
#[derive(Debug, Clone)]
pub struct TextInput {
    title: String,
    hint: String,
    text: String,
    caret: usize,
    secret: bool,
    active: bool,
}

impl TextInput {
    /// Creates an empty field with a border title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hint: String::new(),
            text: String::new(),
            caret: 0,
            secret: false,
            active: false,
        }
    }

    /// Renders the value as mask glyphs.
    #[must_use]
    pub fn password(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Text shown dimmed while the field is empty.
    #[must_use]
    pub fn placeholder(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    /// Highlights the border and draws the caret.
    pub fn set_focused(&mut self, active: bool) {
        self.active = active;
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.text
    }

    /// Replaces the value and parks the caret at the end.
    pub fn set_value(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.caret = self.len();
    }

    /// Zeroes the backing buffer before clearing it.
    pub fn wipe(&mut self) {
        self.text.zeroize();
        self.caret = 0;
    }

    /// Applies an editing key. Returns whether the value changed.
    ///
    /// Characters typed with Ctrl or Alt held are shortcuts, not text.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let len = self.len();
        match key.code {
            KeyCode::Char(_)
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                false
            }
            KeyCode::Char(c) => {
                let at = self.offset(self.caret);
                self.text.insert(at, c);
                self.caret += 1;
                true
            }
            KeyCode::Backspace if self.caret > 0 => {
                self.caret -= 1;
                self.text.remove(self.offset(self.caret));
                true
            }
            KeyCode::Delete if self.caret < len => {
                self.text.remove(self.offset(self.caret));
                true
            }
            KeyCode::Left => {
                self.caret = self.caret.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.caret = (self.caret + 1).min(len);
                false
            }
            KeyCode::Home => {
                self.caret = 0;
                false
            }
            KeyCode::End => {
                self.caret = len;
                false
            }
            _ => false,
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map_or(self.text.len(), |(at, _)| at)
    }

    fn shown(&self) -> String {
        match (self.text.is_empty(), self.secret) {
            (true, _) => self.hint.clone(),
            (false, true) => std::iter::repeat_n(MASK, self.len()).collect(),
            (false, false) => self.text.clone(),
        }
    }

    // Mask glyphs are one column each.
    fn caret_column(&self) -> usize {
        if self.secret {
            self.caret
        } else {
            self.text[..self.offset(self.caret)].width()
        }
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.active {
                Color::Cyan
            } else {
                Color::Gray
            }))
            .title(self.title.as_str());
        let inner = frame.inner(area);
        frame.render(area, buf);

        let fg = if self.text.is_empty() {
            Color::DarkGray
        } else {
            Color::White
        };
        Paragraph::new(self.shown())
            .style(Style::default().fg(fg))
            .render(inner, buf);

        if !self.active || inner.width == 0 {
            return;
        }
        let column = u16::try_from(self.caret_column()).unwrap_or(u16::MAX);
        let x = inner.x.saturating_add(column);
        if x < inner.right() {
            buf[(x, inner.y)].set_style(Style::default().bg(Color::White).fg(Color::Black));
        }
    }
}
