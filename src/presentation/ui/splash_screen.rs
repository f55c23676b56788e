//! Splash screen.

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Paragraph, Widget},
};
use tachyonfx::{Effect as Fx, Interpolation, fx};

use super::page::Effect;
use crate::presentation::events::{AppEvent, TICK_RATE};

/// How long the logo stays up before the login page.
pub const SPLASH_DURATION: Duration = Duration::from_secs(1);

const LOGO_TEXT: &str = r"
       __       __
 ___ _/ /____ _/ /____ __
/ _ `/ __(_-</  '_/ // /
\_,_/\__/___/_/\_\\_, /
                 /___/";

const HELP_TEXT: &str = "any key: skip";

/// Logo intro that hands over to the login page.
pub struct SplashScreen {
    intro: Fx,
    elapsed: Duration,
    pending_duration: Duration,
    intro_finished: bool,
    finished: bool,
}

impl Default for SplashScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashScreen {
    /// Creates new splash screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            intro: fx::coalesce((800, Interpolation::CircOut)),
            elapsed: Duration::ZERO,
            pending_duration: Duration::ZERO,
            intro_finished: false,
            finished: false,
        }
    }

    pub(super) fn init(&mut self) -> Vec<Effect> {
        self.elapsed = Duration::ZERO;
        self.finished = false;
        vec![Effect::Help(HELP_TEXT.to_string())]
    }

    pub(super) fn update(&mut self, event: &AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Tick => {
                self.elapsed = self.elapsed.saturating_add(TICK_RATE);
                self.pending_duration = self.pending_duration.saturating_add(TICK_RATE);
                if self.elapsed >= SPLASH_DURATION {
                    self.finish()
                } else {
                    Vec::new()
                }
            }
            AppEvent::Key(_) => self.finish(),
            _ => Vec::new(),
        }
    }

    fn finish(&mut self) -> Vec<Effect> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;
        vec![Effect::Next]
    }
}

impl Widget for &mut SplashScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from(LOGO_TEXT.trim_matches('\n'))
            .style(Style::default().fg(Color::Cyan))
            .centered();

        let text_width = u16::try_from(text.lines.iter().map(Line::width).max().unwrap_or(0))
            .unwrap_or(u16::MAX);
        let text_height = u16::try_from(text.lines.len()).unwrap_or(u16::MAX);

        let logo_area = Rect::new(
            area.x + area.width.saturating_sub(text_width) / 2,
            area.y + area.height.saturating_sub(text_height) / 2,
            text_width.min(area.width),
            text_height.min(area.height),
        );

        Paragraph::new(text).render(logo_area, buf);

        let duration = std::mem::take(&mut self.pending_duration);
        if !self.intro_finished {
            let overflow = self.intro.process(duration.into(), buf, logo_area);
            self.intro_finished = overflow.is_some();
        }
    }
}
