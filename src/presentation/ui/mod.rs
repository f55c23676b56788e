//! UI pages and navigation.

mod app;
mod auth_screen;
mod context;
mod login_screen;
mod main_screen;
mod navigator;
mod page;
mod splash_screen;
mod task;

pub use app::App;
pub use auth_screen::AuthScreen;
pub use context::PageContext;
pub use login_screen::{LoginScreen, LoginState};
pub use main_screen::MainScreen;
pub use navigator::Navigator;
pub use page::{Effect, Page, PageKind, build_page};
pub use splash_screen::{SPLASH_DURATION, SplashScreen};
pub use task::{PendingTask, TaskPoll};
