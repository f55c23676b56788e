//! DNS lookup port definition.

use async_trait::async_trait;

use crate::domain::errors::LookupError;

/// Port for the DNS queries used during identity resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsResolverPort: Send + Sync {
    /// Returns TXT record strings for `name`.
    async fn txt_records(&self, name: &str) -> Result<Vec<String>, LookupError>;

    /// Returns mail exchange hosts for `domain`.
    async fn mx_records(&self, domain: &str) -> Result<Vec<String>, LookupError>;
}
