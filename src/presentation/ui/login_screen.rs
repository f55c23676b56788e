//! Login screen.

use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use tracing::debug;

use super::context::PageContext;
use super::page::Effect;
use super::task::{PendingTask, TaskPoll};
use crate::application::{IdentityResolver, ResolvedIdentity};
use crate::domain::entities::Credentials;
use crate::domain::errors::ValidationError;
use crate::presentation::events::{AppEvent, EventHandler};
use crate::presentation::widgets::{StatusMessage, TextInput};

const HELP_TEXT: &str = "tab: switch field • enter: submit • ctrl+c: quit";

/// Form progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    /// Accepting input.
    Input,
    /// Identifier lookup running in the background.
    Validating,
    /// Credentials handed to the auth page.
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Identifier,
    Password,
}

type Validation = PendingTask<Result<ResolvedIdentity, ValidationError>>;

/// Identifier and app password form.
pub struct LoginScreen {
    identifier_input: TextInput,
    password_input: TextInput,
    focus: Field,
    state: LoginState,
    validation: Option<Validation>,
    session_checked: bool,
    error_shown: bool,
}

impl LoginScreen {
    /// Creates the form, prefilled with the stored identifier.
    #[must_use]
    pub fn new(ctx: &PageContext) -> Self {
        let mut identifier_input =
            TextInput::new(" Handle or email ").placeholder("alice.bsky.social");
        identifier_input.set_value(ctx.account().identifier);
        identifier_input.set_focused(true);

        let password_input = TextInput::new(" App password ")
            .password()
            .placeholder("xxxx-xxxx-xxxx-xxxx");

        Self {
            identifier_input,
            password_input,
            focus: Field::Identifier,
            state: LoginState::Input,
            validation: None,
            session_checked: false,
            error_shown: false,
        }
    }

    /// Returns current state.
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    /// Returns the identifier typed so far.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.identifier_input.value()
    }

    /// Returns whether the password field is empty.
    #[must_use]
    pub fn password_is_empty(&self) -> bool {
        self.password_input.value().is_empty()
    }

    pub(super) fn init(&mut self) -> Vec<Effect> {
        vec![Effect::Help(HELP_TEXT.to_string())]
    }

    pub(super) fn update(&mut self, event: &AppEvent, ctx: &PageContext) -> Vec<Effect> {
        if !self.session_checked {
            self.session_checked = true;
            if ctx.account().has_resumable_session() {
                debug!("Stored session is resumable, skipping login form");
                self.state = LoginState::Submitted;
                return vec![Effect::Next, Effect::Send(AppEvent::StartAuth)];
            }
        }

        match event {
            AppEvent::FormCompleted => {
                debug!(identifier = self.identifier(), "Login form completed");
                self.state = LoginState::Submitted;
                vec![
                    Effect::ClearStatus,
                    Effect::Next,
                    Effect::Send(AppEvent::StartAuth),
                ]
            }
            AppEvent::Tick => self.poll_validation(ctx),
            AppEvent::Key(key) => self.handle_key(key, ctx),
            _ => Vec::new(),
        }
    }

    fn poll_validation(&mut self, ctx: &PageContext) -> Vec<Effect> {
        let Some(task) = self.validation.as_mut() else {
            return Vec::new();
        };

        let result = match task.try_take() {
            TaskPoll::Pending => return Vec::new(),
            TaskPoll::Ready(result) => result,
            TaskPoll::Lost => {
                self.validation = None;
                return self.show_error("Identifier check was interrupted");
            }
        };
        self.validation = None;

        match result {
            Ok(resolved) => self.accept(resolved, ctx),
            Err(err) => {
                debug!(error = %err, "Identifier rejected");
                self.set_focus(Field::Identifier);
                self.show_error(err.to_string())
            }
        }
    }

    fn accept(&mut self, resolved: ResolvedIdentity, ctx: &PageContext) -> Vec<Effect> {
        let identifier = resolved.identifier.as_str().to_string();
        ctx.set_credentials(Credentials::new(
            identifier.clone(),
            self.password_input.value(),
        ));
        self.password_input.wipe();

        ctx.update_account(|account| {
            if account.identifier != identifier {
                account.clear_session();
            }
            account.identifier = identifier;
            account.did = resolved.did;
        });

        self.state = LoginState::Submitted;
        vec![Effect::Send(AppEvent::FormCompleted)]
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &PageContext) -> Vec<Effect> {
        if self.state != LoginState::Input {
            return Vec::new();
        }

        if EventHandler::is_focus_switch(key) {
            let next = match self.focus {
                Field::Identifier => Field::Password,
                Field::Password => Field::Identifier,
            };
            self.set_focus(next);
            return Vec::new();
        }

        if EventHandler::is_submit_event(key) {
            return self.submit(ctx);
        }

        if self.focused_input().handle_key(key) && self.error_shown {
            self.error_shown = false;
            return vec![Effect::ClearStatus];
        }
        Vec::new()
    }

    fn submit(&mut self, ctx: &PageContext) -> Vec<Effect> {
        if self.focus == Field::Identifier {
            self.set_focus(Field::Password);
            return Vec::new();
        }

        if let Err(err) = IdentityResolver::validate_password(self.password_input.value()) {
            return self.show_error(err.to_string());
        }

        let raw = self.identifier_input.value().to_string();
        let resolver = ctx.resolver.clone();
        self.validation = Some(PendingTask::spawn(async move {
            resolver.validate_identifier(&raw).await
        }));
        self.state = LoginState::Validating;
        self.error_shown = false;

        vec![Effect::Status(StatusMessage::info("Checking identifier"))]
    }

    fn show_error(&mut self, message: impl Into<String>) -> Vec<Effect> {
        self.state = LoginState::Input;
        self.error_shown = true;
        vec![Effect::Status(StatusMessage::error(message))]
    }

    fn set_focus(&mut self, field: Field) {
        self.focus = field;
        self.identifier_input.set_focused(field == Field::Identifier);
        self.password_input.set_focused(field == Field::Password);
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            Field::Identifier => &mut self.identifier_input,
            Field::Password => &mut self.password_input,
        }
    }
}

impl Drop for LoginScreen {
    fn drop(&mut self) {
        self.password_input.wipe();
    }
}

impl Widget for &LoginScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, center, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(11),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, form_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Max(56),
            Constraint::Fill(1),
        ])
        .areas(center);

        Clear.render(form_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Sign in to Bluesky ");
        let inner = block.inner(form_area);
        block.render(form_area, buf);

        let [hint, _, identifier, password, state] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new("Use an app password, not your account password")
            .style(Style::default().fg(Color::Gray))
            .render(hint, buf);

        self.identifier_input.render(identifier, buf);
        self.password_input.render(password, buf);

        let line = match self.state {
            LoginState::Input => Line::default(),
            LoginState::Validating => Line::from(Span::styled(
                "Checking identifier...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            LoginState::Submitted => Line::from(Span::styled(
                "Signing in...",
                Style::default().fg(Color::Green),
            )),
        };
        Paragraph::new(line).render(state, buf);
    }
}
