//! Profile lookup port definition.

use async_trait::async_trait;

use crate::domain::entities::{Jwt, Profile};
use crate::domain::errors::AuthError;

/// Port for authenticated actor queries.
#[async_trait]
pub trait ProfilePort: Send + Sync {
    /// Fetches the profile of `actor` using `access` as bearer token.
    async fn get_profile(
        &self,
        server: &str,
        access: &Jwt,
        actor: &str,
    ) -> Result<Profile, AuthError>;
}
