//! Page navigation state machine.

use std::collections::VecDeque;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Widget},
};
use tracing::debug;

use super::context::PageContext;
use super::page::{Effect, Page, PageKind, build_page};
use crate::presentation::events::{AppEvent, EventHandler};
use crate::presentation::widgets::{StatusBar, StatusMessage};

const FRAME_COLOR: Color = Color::Rgb(0x20, 0x81, 0xFE);

/// Ordered pages, the current index and the footer state.
///
/// Events are handled one at a time. Effects returned by a page are applied
/// in order, and events a page sends to itself are handled before
/// [`Navigator::dispatch`] returns.
pub struct Navigator {
    pages: Vec<Page>,
    index: usize,
    status: Option<StatusMessage>,
    help: String,
    size: (u16, u16),
    queue: VecDeque<AppEvent>,
    ctx: PageContext,
    should_quit: bool,
}

impl Navigator {
    /// Creates navigator positioned on the splash page.
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self::starting_at(ctx, PageKind::Splash)
    }

    /// Creates navigator positioned on `kind`.
    #[must_use]
    pub fn starting_at(ctx: PageContext, kind: PageKind) -> Self {
        let pages = PageKind::ORDER
            .iter()
            .map(|&kind| build_page(kind, &ctx))
            .collect();

        Self {
            pages,
            index: kind.index(),
            status: None,
            help: String::new(),
            size: (0, 0),
            queue: VecDeque::new(),
            ctx,
            should_quit: false,
        }
    }

    /// Runs `init` of the current page.
    pub fn start(&mut self) {
        debug!(page = self.current_kind().name(), "Starting navigation");
        let effects = self.pages[self.index].init(&self.ctx);
        self.apply_all(effects);
        self.drain();
    }

    /// Handles one external event and everything it triggers.
    pub fn dispatch(&mut self, event: AppEvent) {
        self.queue.push_back(event);
        self.drain();
    }

    fn drain(&mut self) {
        while let Some(event) = self.queue.pop_front() {
            if self.should_quit {
                self.queue.clear();
                return;
            }
            self.handle(&event);
        }
    }

    fn handle(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Resize { width, height } => {
                self.size = (*width, *height);
                return;
            }
            AppEvent::Quit => {
                self.should_quit = true;
                return;
            }
            AppEvent::Key(key) if EventHandler::is_quit_event(key) => {
                debug!("Quit requested");
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        let effects = self.pages[self.index].update(event, &self.ctx);
        self.apply_all(effects);
    }

    fn apply_all(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Next => self.next(),
            Effect::Prev => self.prev(),
            Effect::Back(kind) => self.back_to(kind),
            Effect::Send(event) => self.queue.push_back(event),
            Effect::Status(status) => self.status = Some(status),
            Effect::ClearStatus => self.status = None,
            Effect::Help(help) => self.help = help,
            Effect::Quit => self.should_quit = true,
        }
    }

    fn next(&mut self) {
        if self.index + 1 >= self.pages.len() {
            return;
        }
        let from = self.current_kind();
        self.index += 1;
        debug!(from = from.name(), to = self.current_kind().name(), "Advancing");

        self.help.clear();
        let effects = self.pages[self.index].init(&self.ctx);
        self.apply_all(effects);
    }

    fn prev(&mut self) {
        if self.index == 0 {
            return;
        }
        self.back_to(PageKind::ORDER[self.index - 1]);
    }

    fn back_to(&mut self, to: PageKind) {
        let target = to.index();
        if target >= self.index {
            return;
        }
        let from = self.current_kind();
        for kind in &PageKind::ORDER[target..=self.index] {
            if kind.rebuilds_on_return() {
                self.pages[kind.index()] = build_page(*kind, &self.ctx);
            }
        }

        self.index = target;
        debug!(from = from.name(), to = to.name(), "Regressing");

        self.help.clear();
        let effects = self.pages[self.index].init(&self.ctx);
        self.apply_all(effects);
    }

    /// Returns the current page kind.
    #[must_use]
    pub fn current_kind(&self) -> PageKind {
        self.pages[self.index].kind()
    }

    /// Returns the current page.
    #[must_use]
    pub fn current_page(&self) -> &Page {
        &self.pages[self.index]
    }

    /// Returns the status message.
    #[must_use]
    pub const fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Returns the help text.
    #[must_use]
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Returns the last reported terminal size.
    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Returns whether the program should exit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draws the current page and the footer.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let [body, footer] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

        let frame = Block::default()
            .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(FRAME_COLOR));
        let inner = frame.inner(body);
        frame.render(body, buf);

        self.pages[self.index].render(inner, buf);

        StatusBar::new()
            .help(&self.help)
            .status(self.status.as_ref())
            .size(self.size.0, self.size.1)
            .render(footer, buf);
    }
}
