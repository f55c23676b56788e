//! Use case implementations.

mod login_use_case;
mod resume_session_use_case;

pub use login_use_case::LoginUseCase;
pub use resume_session_use_case::{ResumeDecision, ResumeSessionUseCase};
