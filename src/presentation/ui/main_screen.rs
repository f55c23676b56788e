//! Signed-in view.

use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use tracing::{debug, info, warn};

use super::context::PageContext;
use super::page::{Effect, PageKind};
use super::task::{PendingTask, TaskPoll};
use crate::application::SessionRefresher;
use crate::domain::entities::{Account, Profile, Session};
use crate::domain::errors::AuthError;
use crate::presentation::events::AppEvent;
use crate::presentation::widgets::{Spinner, StatusMessage};

const HELP_TEXT: &str = "r: reload profile • q: quit";

/// Owns the session refresher and shows the signed-in profile.
#[derive(Default)]
pub struct MainScreen {
    spinner: Spinner,
    starting: Option<PendingTask<Result<SessionRefresher, AuthError>>>,
    refresher: Option<SessionRefresher>,
    profile_task: Option<PendingTask<Result<Profile, AuthError>>>,
    profile: Option<Profile>,
}

impl MainScreen {
    /// Creates empty screen. The session starts on `init`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the running refresher.
    #[must_use]
    pub const fn refresher(&self) -> Option<&SessionRefresher> {
        self.refresher.as_ref()
    }

    /// Returns the loaded profile.
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub(super) fn init(&mut self, ctx: &PageContext) -> Vec<Effect> {
        *self = Self::new();

        let Some(session) = ctx.take_session().or_else(|| stored_session(&ctx.account())) else {
            warn!("No session to start");
            return vec![
                Effect::Back(PageKind::Login),
                Effect::Status(StatusMessage::error("No session available")),
            ];
        };

        let auth_port = ctx.auth_port.clone();
        let store = ctx.store.clone();
        self.starting = Some(PendingTask::spawn(async move {
            SessionRefresher::start(auth_port, session, Some(store)).await
        }));

        vec![
            Effect::Help(HELP_TEXT.to_string()),
            Effect::Status(StatusMessage::info("Starting session")),
        ]
    }

    pub(super) fn update(&mut self, event: &AppEvent, ctx: &PageContext) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            AppEvent::Tick => self.spinner.advance(),
            AppEvent::Key(key) => match key.code {
                KeyCode::Char('q') => return vec![Effect::Quit],
                KeyCode::Char('r') if self.refresher.is_some() && self.profile_task.is_none() => {
                    self.fetch_profile(ctx);
                    effects.push(Effect::Status(StatusMessage::info("Reloading profile")));
                }
                _ => {}
            },
            _ => {}
        }

        effects.extend(self.poll_start(ctx));
        effects.extend(self.poll_profile());
        effects
    }

    fn poll_start(&mut self, ctx: &PageContext) -> Vec<Effect> {
        let Some(task) = self.starting.as_mut() else {
            return Vec::new();
        };
        let result = match task.try_take() {
            TaskPoll::Pending => return Vec::new(),
            TaskPoll::Ready(result) => result,
            TaskPoll::Lost => Err(AuthError::unexpected("session worker stopped")),
        };
        self.starting = None;

        match result {
            Ok(refresher) => {
                info!(did = %refresher.did(), "Session started");
                self.refresher = Some(refresher);
                self.fetch_profile(ctx);
                Vec::new()
            }
            Err(err) => {
                warn!(error = %err, "Session could not be started");
                forget_session(ctx, &err);
                vec![
                    Effect::Back(PageKind::Login),
                    Effect::Status(StatusMessage::error(err.to_string())),
                ]
            }
        }
    }

    fn fetch_profile(&mut self, ctx: &PageContext) {
        let Some(refresher) = self.refresher.clone() else {
            return;
        };
        let profiles = ctx.profile_port.clone();
        let fallback_actor = ctx.account().identifier;

        self.profile_task = Some(PendingTask::spawn(async move {
            let token = refresher.auth_token().await;
            let did = refresher.did();
            let actor = if did.is_empty() { fallback_actor } else { did };
            profiles
                .get_profile(&refresher.server(), &token, &actor)
                .await
        }));
    }

    fn poll_profile(&mut self) -> Vec<Effect> {
        let Some(task) = self.profile_task.as_mut() else {
            return Vec::new();
        };
        let result = match task.try_take() {
            TaskPoll::Pending => return Vec::new(),
            TaskPoll::Ready(result) => result,
            TaskPoll::Lost => Err(AuthError::unexpected("profile worker stopped")),
        };
        self.profile_task = None;

        match result {
            Ok(profile) => {
                debug!(handle = %profile.handle, "Profile loaded");
                let text = format!("Signed in as {}", profile.handle);
                self.profile = Some(profile);
                vec![Effect::Status(StatusMessage::success(text))]
            }
            Err(err) => {
                warn!(error = %err, "Profile lookup failed");
                vec![Effect::Status(StatusMessage::error(format!(
                    "Profile unavailable: {err}"
                )))]
            }
        }
    }
}

fn stored_session(account: &Account) -> Option<Session> {
    if !account.has_resumable_session() {
        return None;
    }
    let refresh = account.refresh_jwt.clone()?;
    Some(Session::resumed(
        refresh,
        account.server.clone(),
        account.did.clone().unwrap_or_default(),
    ))
}

/// Drops the in-memory session so the login form shows. The stored token is
/// only erased when the server refused it.
fn forget_session(ctx: &PageContext, err: &AuthError) {
    ctx.update_account(Account::clear_session);
    if !err.invalidates_session() {
        return;
    }

    let account = ctx.account();
    let store = ctx.store.clone();
    tokio::spawn(async move {
        if let Err(e) = store.save_account(&account).await {
            warn!(error = %e, "Failed to clear refused refresh token");
        }
    });
}

impl Widget for &MainScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(profile) = &self.profile else {
            let [_, line, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(area);
            self.spinner.with_label("Loading profile...").render(line, buf);
            return;
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Profile ");
        let inner = block.inner(area);
        block.render(area, buf);

        let dim = Style::default().fg(Color::Gray);
        let mut lines = vec![
            Line::from(Span::styled(
                profile.name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("@{}", profile.handle), dim)),
            Line::from(Span::styled(profile.did.clone(), dim)),
            Line::default(),
        ];
        if let Some(description) = profile.description.as_deref() {
            lines.extend(description.lines().map(|text| Line::from(text.to_string())));
            lines.push(Line::default());
        }
        lines.push(Line::from(format!(
            "{} followers · {} following · {} posts",
            profile.followers_count, profile.follows_count, profile.posts_count
        )));

        if let Some(at) = self
            .refresher
            .as_ref()
            .and_then(SessionRefresher::scheduled_refresh_at)
        {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!("Next token refresh at {}", at.format("%H:%M:%S UTC")),
                dim,
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
