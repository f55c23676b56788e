//! Domain entity definitions.

mod account;
mod credentials;
mod identifier;
mod profile;
mod session;
mod token;

pub use account::{Account, DEFAULT_SERVER};
pub use credentials::Credentials;
pub use identifier::{DISALLOWED_SUFFIXES, Identifier, IdentifierKind};
pub use profile::Profile;
pub use session::Session;
pub use token::{Jwt, TokenPair};

#[cfg(test)]
pub use token::testing as jwt_testing;
