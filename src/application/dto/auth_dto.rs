//! Authentication DTOs.

use crate::domain::entities::{Identifier, Session};
use crate::domain::errors::AuthError;

/// How a session was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    /// Resumed from the stored refresh token.
    Stored,
    /// Created from identifier and app password.
    Password,
    /// Created from identifier and app password, but not written to disk.
    Unsaved,
}

impl SessionSource {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Stored => "stored session",
            Self::Password => "app password",
            Self::Unsaved => "unsaved app password login",
        }
    }
}

impl std::fmt::Display for SessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// New session.
    pub session: Session,
    /// Whether identifier and refresh token were persisted.
    pub persisted: bool,
}

/// Identifier that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Classified identifier.
    pub identifier: Identifier,
    /// DID discovered during handle resolution.
    pub did: Option<String>,
}

/// Result of a background authentication attempt.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// A usable session exists.
    Authenticated {
        /// Session to hand to the refresher. A resumed session carries only
        /// the stored refresh token until the first refresh.
        session: Session,
        /// Where it came from.
        source: SessionSource,
    },
    /// Authentication did not succeed.
    Failed(AuthError),
}

impl AuthOutcome {
    /// Returns status line text for the outcome.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Self::Authenticated {
                source: SessionSource::Stored,
                ..
            } => "Authenticated".to_string(),
            Self::Authenticated {
                source: SessionSource::Password,
                ..
            } => "Login successful".to_string(),
            Self::Authenticated {
                source: SessionSource::Unsaved,
                ..
            } => "Login successful, but the session could not be saved".to_string(),
            Self::Failed(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Jwt;

    #[test]
    fn test_status_text_by_source() {
        let session = Session::resumed(Jwt::new("r"), "bsky.social", "did:plc:x");
        let stored = AuthOutcome::Authenticated {
            session: session.clone(),
            source: SessionSource::Stored,
        };
        let password = AuthOutcome::Authenticated {
            session: session.clone(),
            source: SessionSource::Password,
        };
        let unsaved = AuthOutcome::Authenticated {
            session,
            source: SessionSource::Unsaved,
        };

        assert_eq!(stored.status_text(), "Authenticated");
        assert_eq!(password.status_text(), "Login successful");
        assert!(unsaved.status_text().contains("could not be saved"));
    }

    #[test]
    fn test_failed_outcome_shows_error() {
        let outcome = AuthOutcome::Failed(AuthError::missing("No password provided"));

        assert_eq!(outcome.status_text(), "No password provided");
    }
}
