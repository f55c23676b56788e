mod auth_port;
mod dns_port;
mod profile_port;
mod session_store_port;
mod well_known_port;

pub use auth_port::AuthPort;
pub use dns_port::DnsResolverPort;
pub use profile_port::ProfilePort;
pub use session_store_port::SessionStorePort;
pub use well_known_port::{WellKnownPort, WellKnownResponse};

#[cfg(test)]
pub mod mocks {
    pub use super::auth_port::mock::MockAuthPort;
    pub use super::dns_port::MockDnsResolverPort;
    pub use super::profile_port::mock::MockProfilePort;
    pub use super::session_store_port::mock::MockSessionStore;
    pub use super::well_known_port::MockWellKnownPort;
}
