//! Domain error types.

mod auth_error;
mod lookup_error;
mod validation_error;

pub use auth_error::AuthError;
pub use lookup_error::LookupError;
pub use validation_error::ValidationError;
