//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{Account, Credentials, Identifier, Jwt, Session};
pub use errors::{AuthError, ValidationError};
pub use ports::{AuthPort, SessionStorePort};
