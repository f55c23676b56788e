//! Application layer with use cases, services and DTOs.

/// Data transfer objects.
pub mod dto;
/// Identity and session services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{AuthOutcome, LoginResponse, ResolvedIdentity, SessionSource};
pub use services::{IdentityResolver, SessionRefresher};
pub use use_cases::{LoginUseCase, ResumeDecision, ResumeSessionUseCase};
