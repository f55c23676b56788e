//! System DNS adapter.

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use tracing::{debug, warn};

use crate::domain::errors::LookupError;
use crate::domain::ports::DnsResolverPort;

/// TXT and MX lookups through hickory.
pub struct HickoryDnsResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsResolver {
    /// Creates resolver from the system configuration, falling back to the
    /// library defaults when none can be read.
    #[must_use]
    pub fn new() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|e| {
            warn!(error = %e, "System DNS configuration unavailable, using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }
}

impl Default for HickoryDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsResolverPort for HickoryDnsResolver {
    async fn txt_records(&self, name: &str) -> Result<Vec<String>, LookupError> {
        let lookup = self
            .resolver
            .txt_lookup(name)
            .await
            .map_err(|e| LookupError::new(name, e))?;

        let records: Vec<String> = lookup
            .iter()
            .map(|txt| {
                txt.iter()
                    .map(|chunk| String::from_utf8_lossy(chunk))
                    .collect::<String>()
            })
            .collect();

        debug!(name, count = records.len(), "TXT lookup");
        Ok(records)
    }

    async fn mx_records(&self, domain: &str) -> Result<Vec<String>, LookupError> {
        let lookup = self
            .resolver
            .mx_lookup(domain)
            .await
            .map_err(|e| LookupError::new(domain, e))?;

        let hosts: Vec<String> = lookup.iter().map(|mx| mx.exchange().to_string()).collect();

        debug!(domain, count = hosts.len(), "MX lookup");
        Ok(hosts)
    }
}
