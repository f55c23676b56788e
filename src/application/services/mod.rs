//! Application services.

mod identity_resolver;
mod session_refresher;

pub use identity_resolver::IdentityResolver;
pub use session_refresher::{REFRESH_LEAD, SessionRefresher};
