//! Authentication progress screen.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Paragraph, Widget},
};
use tracing::{debug, info, warn};

use super::context::PageContext;
use super::page::Effect;
use super::task::{PendingTask, TaskPoll};
use crate::application::{AuthOutcome, ResumeDecision, SessionSource};
use crate::domain::entities::Account;
use crate::domain::errors::AuthError;
use crate::presentation::events::AppEvent;
use crate::presentation::widgets::{Spinner, StatusMessage};

const HELP_TEXT: &str = "ctrl+c: quit";

/// Runs authentication in the background and reports the result once.
pub struct AuthScreen {
    spinner: Spinner,
    message: &'static str,
    identifier: String,
    task: Option<PendingTask<AuthOutcome>>,
}

impl Default for AuthScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthScreen {
    /// Creates idle screen. The worker starts on `init`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            spinner: Spinner::default(),
            message: "Initializing",
            identifier: String::new(),
            task: None,
        }
    }

    /// Returns the progress message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }

    pub(super) fn init(&mut self, ctx: &PageContext) -> Vec<Effect> {
        self.identifier = ctx.account().identifier;
        self.task = Some(PendingTask::spawn(authenticate(ctx.clone())));
        vec![Effect::Help(HELP_TEXT.to_string())]
    }

    pub(super) fn update(&mut self, event: &AppEvent, ctx: &PageContext) -> Vec<Effect> {
        match event {
            AppEvent::Tick => self.spinner.advance(),
            AppEvent::StartAuth => self.message = "Authenticating",
            _ => {}
        }
        self.poll(ctx)
    }

    fn poll(&mut self, ctx: &PageContext) -> Vec<Effect> {
        let Some(task) = self.task.as_mut() else {
            return Vec::new();
        };

        let outcome = match task.try_take() {
            TaskPoll::Pending => return Vec::new(),
            TaskPoll::Ready(outcome) => outcome,
            TaskPoll::Lost => AuthOutcome::Failed(AuthError::unexpected(
                "authentication worker stopped",
            )),
        };
        self.task = None;

        let text = outcome.status_text();
        match outcome {
            AuthOutcome::Authenticated { session, source } => {
                info!(did = session.did(), %source, "Authenticated");
                self.message = "Success";
                ctx.hand_off(session);
                vec![Effect::Status(StatusMessage::success(text)), Effect::Next]
            }
            AuthOutcome::Failed(err) => {
                warn!(error = %err, "Authentication failed");
                self.message = "Failed";
                vec![Effect::Prev, Effect::Status(StatusMessage::error(text))]
            }
        }
    }
}

/// Resumes the stored session or logs in with the pending credentials.
async fn authenticate(ctx: PageContext) -> AuthOutcome {
    let account = ctx.account();

    match ctx.resume.execute(&account).await {
        ResumeDecision::Resumed(session) => {
            return AuthOutcome::Authenticated {
                session,
                source: SessionSource::Stored,
            };
        }
        ResumeDecision::Expired => ctx.update_account(Account::clear_session),
        ResumeDecision::Missing => {}
    }

    if account.identifier.is_empty() {
        return AuthOutcome::Failed(AuthError::missing("No username provided"));
    }
    let Some(mut credentials) = ctx.take_credentials() else {
        return AuthOutcome::Failed(AuthError::missing("No password provided"));
    };

    // Written here rather than from the form so it cannot land after the
    // login's own save and drop the new refresh token.
    if let Err(e) = ctx.store.save_account(&ctx.account()).await {
        warn!(error = %e, "Failed to persist identifier");
    }

    debug!(
        identifier = %account.identifier,
        server = %account.server,
        "Logging in with app password"
    );
    match ctx.login.execute(&mut credentials, &account.server).await {
        Ok(response) => {
            let session = response.session;
            ctx.update_account(|stored| {
                stored.did = Some(session.did().to_string());
                stored.refresh_jwt = Some(session.refresh_token().clone());
            });
            let source = if response.persisted {
                SessionSource::Password
            } else {
                SessionSource::Unsaved
            };
            AuthOutcome::Authenticated { session, source }
        }
        Err(err) => AuthOutcome::Failed(err),
    }
}

impl Widget for &AuthScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, progress, status, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        let label = format!("Authenticating as {}...", self.identifier);
        self.spinner.with_label(&label).render(progress, buf);

        Paragraph::new(
            Line::from(format!("Status: {}", self.message))
                .style(Style::default().fg(Color::Gray))
                .centered(),
        )
        .render(status, buf);
    }
}
