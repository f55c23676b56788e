//! Event handling.

use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Interval between `Tick` events.
pub const TICK_RATE: Duration = Duration::from_millis(50);

/// Events fed to the navigator, one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Key press.
    Key(KeyEvent),
    /// Terminal resized.
    Resize {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// Periodic tick driving animations and background polling.
    Tick,
    /// Exit requested.
    Quit,
    /// Login form validated and credentials are waiting.
    FormCompleted,
    /// Authentication worker should report progress.
    StartAuth,
}

impl AppEvent {
    /// Converts a terminal event. Key releases and mouse input are dropped.
    #[must_use]
    pub fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Self::Key(key)),
            Event::Resize(width, height) => Some(Self::Resize { width, height }),
            _ => None,
        }
    }
}

/// Key classification helpers.
pub struct EventHandler;

impl EventHandler {
    /// Checks if key quits from any page.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        )
    }

    /// Checks if key is a submit event.
    #[must_use]
    pub fn is_submit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Enter,
                ..
            }
        )
    }

    /// Checks if key moves focus between fields.
    #[must_use]
    pub fn is_focus_switch(key: &KeyEvent) -> bool {
        matches!(
            key.code,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    #[test]
    fn test_quit_events() {
        assert!(EventHandler::is_quit_event(&make_key_event(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
    }

    #[test]
    fn test_typing_q_does_not_quit() {
        assert!(!EventHandler::is_quit_event(&make_key_event(
            KeyCode::Char('q'),
            KeyModifiers::NONE
        )));
        assert!(!EventHandler::is_quit_event(&make_key_event(
            KeyCode::Esc,
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn test_submit_event() {
        assert!(EventHandler::is_submit_event(&make_key_event(
            KeyCode::Enter,
            KeyModifiers::NONE
        )));
        assert!(!EventHandler::is_submit_event(&make_key_event(
            KeyCode::Char('a'),
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn test_from_terminal_drops_releases() {
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(AppEvent::from_terminal(Event::Key(release)), None);
        assert_eq!(
            AppEvent::from_terminal(Event::Resize(80, 24)),
            Some(AppEvent::Resize {
                width: 80,
                height: 24
            })
        );
    }
}
