//! Terminal event loop.

use crossterm::event::EventStream;
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use super::context::PageContext;
use super::navigator::Navigator;
use super::page::PageKind;
use crate::presentation::events::{AppEvent, TICK_RATE};

/// Feeds terminal events and ticks to the navigator and redraws after each.
pub struct App {
    navigator: Navigator,
}

impl App {
    /// Creates the application, optionally starting on the login page.
    #[must_use]
    pub fn new(ctx: PageContext, skip_splash: bool) -> Self {
        let first = if skip_splash {
            PageKind::Login
        } else {
            PageKind::Splash
        };
        Self {
            navigator: Navigator::starting_at(ctx, first),
        }
    }

    /// Runs until a page or the user asks to quit.
    ///
    /// # Errors
    /// Returns error if the terminal cannot be read or drawn.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.navigator.dispatch(AppEvent::Resize {
            width: size.width,
            height: size.height,
        });
        self.navigator.start();

        let mut terminal_events = EventStream::new();
        let mut ticker = interval(TICK_RATE);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        terminal.draw(|frame| self.render(frame))?;

        while !self.navigator.should_quit() {
            tokio::select! {
                _ = ticker.tick() => {
                    self.navigator.dispatch(AppEvent::Tick);
                }
                event = terminal_events.next() => match event {
                    Some(Ok(event)) => {
                        if let Some(event) = AppEvent::from_terminal(event) {
                            self.navigator.dispatch(event);
                        }
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Terminal event stream failed");
                        return Err(e.into());
                    }
                    None => self.navigator.dispatch(AppEvent::Quit),
                }
            }
            terminal.draw(|frame| self.render(frame))?;
        }

        info!("Application exiting normally");
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.navigator.render(area, frame.buffer_mut());
    }
}
