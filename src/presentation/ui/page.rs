//! Pages and the effects they return.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use super::auth_screen::AuthScreen;
use super::context::PageContext;
use super::login_screen::LoginScreen;
use super::main_screen::MainScreen;
use super::splash_screen::SplashScreen;
use crate::presentation::events::AppEvent;
use crate::presentation::widgets::StatusMessage;

/// Instruction returned by a page to the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Advance one page.
    Next,
    /// Go back one page.
    Prev,
    /// Go back to an earlier page. Pages in between are rebuilt, never
    /// initialized.
    Back(PageKind),
    /// Dispatch an event before the next external one.
    Send(AppEvent),
    /// Show a status message.
    Status(StatusMessage),
    /// Remove the status message.
    ClearStatus,
    /// Replace the help text.
    Help(String),
    /// Exit the program.
    Quit,
}

/// Page identity, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Logo intro.
    Splash,
    /// Identifier and password form.
    Login,
    /// Background authentication.
    Auth,
    /// Signed-in view.
    App,
}

impl PageKind {
    /// All pages, in navigation order.
    pub const ORDER: [Self; 4] = [Self::Splash, Self::Login, Self::Auth, Self::App];

    /// Position in [`Self::ORDER`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the page is rebuilt when navigating back through it.
    #[must_use]
    pub const fn rebuilds_on_return(self) -> bool {
        matches!(self, Self::Login | Self::Auth)
    }

    /// Name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Splash => "splash",
            Self::Login => "login",
            Self::Auth => "auth",
            Self::App => "app",
        }
    }
}

type PageFactory = fn(&PageContext) -> Page;

const FACTORIES: [PageFactory; 4] = [splash_page, login_page, auth_page, app_page];

fn splash_page(_ctx: &PageContext) -> Page {
    Page::Splash(SplashScreen::new())
}

fn login_page(ctx: &PageContext) -> Page {
    Page::Login(Box::new(LoginScreen::new(ctx)))
}

fn auth_page(_ctx: &PageContext) -> Page {
    Page::Auth(AuthScreen::new())
}

fn app_page(_ctx: &PageContext) -> Page {
    Page::App(Box::new(MainScreen::new()))
}

/// Builds a fresh page of `kind`.
#[must_use]
pub fn build_page(kind: PageKind, ctx: &PageContext) -> Page {
    FACTORIES[kind.index()](ctx)
}

/// A navigable page.
pub enum Page {
    /// Logo intro.
    Splash(SplashScreen),
    /// Login form.
    Login(Box<LoginScreen>),
    /// Authentication progress.
    Auth(AuthScreen),
    /// Signed-in view.
    App(Box<MainScreen>),
}

impl Page {
    /// Returns the page kind.
    #[must_use]
    pub const fn kind(&self) -> PageKind {
        match self {
            Self::Splash(_) => PageKind::Splash,
            Self::Login(_) => PageKind::Login,
            Self::Auth(_) => PageKind::Auth,
            Self::App(_) => PageKind::App,
        }
    }

    /// Runs when the page becomes current.
    pub fn init(&mut self, ctx: &PageContext) -> Vec<Effect> {
        match self {
            Self::Splash(screen) => screen.init(),
            Self::Login(screen) => screen.init(),
            Self::Auth(screen) => screen.init(ctx),
            Self::App(screen) => screen.init(ctx),
        }
    }

    /// Consumes one event. Never blocks.
    pub fn update(&mut self, event: &AppEvent, ctx: &PageContext) -> Vec<Effect> {
        match self {
            Self::Splash(screen) => screen.update(event),
            Self::Login(screen) => screen.update(event, ctx),
            Self::Auth(screen) => screen.update(event, ctx),
            Self::App(screen) => screen.update(event, ctx),
        }
    }

    /// Draws the page.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        match self {
            Self::Splash(screen) => Widget::render(screen, area, buf),
            Self::Login(screen) => Widget::render(&**screen, area, buf),
            Self::Auth(screen) => Widget::render(&*screen, area, buf),
            Self::App(screen) => Widget::render(&**screen, area, buf),
        }
    }

    /// Returns the login screen, if current.
    #[must_use]
    pub fn as_login(&self) -> Option<&LoginScreen> {
        match self {
            Self::Login(screen) => Some(&**screen),
            _ => None,
        }
    }

    /// Returns the app screen, if current.
    #[must_use]
    pub fn as_app(&self) -> Option<&MainScreen> {
        match self {
            Self::App(screen) => Some(&**screen),
            _ => None,
        }
    }
}
