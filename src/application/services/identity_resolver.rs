//! Login identifier validation and handle resolution.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::application::dto::ResolvedIdentity;
use crate::domain::entities::{Identifier, IdentifierKind};
use crate::domain::errors::ValidationError;
use crate::domain::ports::{DnsResolverPort, WellKnownPort};

static APP_PASSWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}-[a-zA-Z0-9]{4}$")
        .expect("Invalid regex")
});

const DID_PREFIX: &str = "did=";
const ATPROTO_TXT_LABEL: &str = "_atproto";

/// Validates identifiers and resolves handles to DIDs.
///
/// Handles resolve through a `_atproto` TXT record first and fall back to the
/// HTTPS well-known document. E-mail identifiers only need a mail exchanger.
#[derive(Clone)]
pub struct IdentityResolver {
    dns: Arc<dyn DnsResolverPort>,
    well_known: Arc<dyn WellKnownPort>,
}

impl IdentityResolver {
    /// Creates new resolver.
    #[must_use]
    pub fn new(dns: Arc<dyn DnsResolverPort>, well_known: Arc<dyn WellKnownPort>) -> Self {
        Self { dns, well_known }
    }

    /// Validates an identifier and, for handles, resolves its DID.
    ///
    /// # Errors
    /// Returns the first syntax or resolution failure.
    pub async fn validate_identifier(
        &self,
        raw: &str,
    ) -> Result<ResolvedIdentity, ValidationError> {
        let identifier = Identifier::parse(raw);

        match identifier.kind() {
            IdentifierKind::Email => {
                self.check_email_domain(&identifier).await?;
                Ok(ResolvedIdentity {
                    identifier,
                    did: None,
                })
            }
            IdentifierKind::Handle => {
                if !identifier.is_well_formed_handle() {
                    return Err(ValidationError::InvalidHandle);
                }
                if let Some(suffix) = identifier.disallowed_suffix() {
                    debug!(handle = %identifier, suffix, "Handle uses reserved TLD");
                    return Err(ValidationError::DisallowedTld);
                }
                let did = self.resolve_handle(identifier.as_str()).await?;
                Ok(ResolvedIdentity {
                    identifier,
                    did: Some(did).filter(|did| !did.is_empty()),
                })
            }
        }
    }

    /// Checks that a password is shaped like an app password.
    ///
    /// # Errors
    /// Returns `PasswordEmpty` or `InvalidPassword`.
    pub fn validate_password(password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::PasswordEmpty);
        }
        if !APP_PASSWORD_REGEX.is_match(password) {
            return Err(ValidationError::InvalidPassword);
        }
        Ok(())
    }

    /// Resolves a well-formed handle to its DID. The DID is empty when the
    /// matching record is a bare `did=`.
    ///
    /// # Errors
    /// Returns `HandleUnresolvable` when neither DNS nor HTTPS yields a DID.
    pub async fn resolve_handle(&self, handle: &str) -> Result<String, ValidationError> {
        let txt_name = format!("{ATPROTO_TXT_LABEL}.{handle}");
        match self.dns.txt_records(&txt_name).await {
            Ok(records) => {
                if let Some(did) = records.iter().find_map(|record| strip_did(record)) {
                    debug!(handle, did, "Handle resolved via DNS");
                    return Ok(did);
                }
                debug!(handle, count = records.len(), "No DID in TXT records");
            }
            Err(e) => {
                debug!(handle, error = %e, "TXT lookup failed, trying well-known");
            }
        }

        match self.well_known.fetch_did(handle).await {
            Ok(response) if response.status == 200 => {
                if let Some(did) = strip_did(&response.body) {
                    debug!(handle, did, "Handle resolved via well-known");
                    return Ok(did);
                }
                warn!(handle, "Well-known body does not carry a DID");
            }
            Ok(response) => {
                debug!(handle, status = response.status, "Well-known lookup refused");
            }
            Err(e) => {
                warn!(handle, error = %e, "Well-known lookup failed");
            }
        }

        Err(ValidationError::HandleUnresolvable)
    }

    async fn check_email_domain(&self, identifier: &Identifier) -> Result<(), ValidationError> {
        let domain = identifier
            .email_domain()
            .ok_or(ValidationError::DomainNotFound)?;

        match self.dns.mx_records(domain).await {
            Ok(hosts) if !hosts.is_empty() => Ok(()),
            Ok(_) => {
                debug!(domain, "Domain has no mail exchanger");
                Err(ValidationError::DomainNotFound)
            }
            Err(e) => {
                debug!(domain, error = %e, "MX lookup failed");
                Err(ValidationError::DomainNotFound)
            }
        }
    }
}

// A bare `did=` still counts as a match; its value is just empty.
fn strip_did(record: &str) -> Option<String> {
    record
        .strip_prefix(DID_PREFIX)
        .map(|did| did.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::LookupError;
    use crate::domain::ports::WellKnownResponse;
    use crate::domain::ports::mocks::{MockDnsResolverPort, MockWellKnownPort};
    use test_case::test_case;

    fn resolver(dns: MockDnsResolverPort, well_known: MockWellKnownPort) -> IdentityResolver {
        IdentityResolver::new(Arc::new(dns), Arc::new(well_known))
    }

    fn unreachable_well_known() -> MockWellKnownPort {
        let mut well_known = MockWellKnownPort::new();
        well_known.expect_fetch_did().never();
        well_known
    }

    #[tokio::test]
    async fn test_handle_resolves_via_txt() {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_txt_records()
            .times(1)
            .returning(|name: &str| {
                assert_eq!(name, "_atproto.alice.bsky.social");
                Ok(vec!["did=did:plc:abc123".to_string()])
            });

        let resolved = resolver(dns, unreachable_well_known())
            .validate_identifier("Alice.bsky.social")
            .await
            .unwrap();

        assert_eq!(resolved.identifier.as_str(), "alice.bsky.social");
        assert_eq!(resolved.did.as_deref(), Some("did:plc:abc123"));
    }

    #[tokio::test]
    async fn test_txt_error_falls_back_to_well_known() {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_txt_records()
            .returning(|name: &str| Err(LookupError::new(name, "SERVFAIL")));
        let mut well_known = MockWellKnownPort::new();
        well_known.expect_fetch_did().times(1).returning(|handle: &str| {
            assert_eq!(handle, "alice.example.com");
            Ok(WellKnownResponse {
                status: 200,
                body: "did=did:web:alice.example.com\n".to_string(),
            })
        });

        let resolved = resolver(dns, well_known)
            .validate_identifier("alice.example.com")
            .await
            .unwrap();

        assert_eq!(resolved.did.as_deref(), Some("did:web:alice.example.com"));
    }

    #[tokio::test]
    async fn test_txt_without_did_falls_back_to_well_known() {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_txt_records()
            .returning(|_: &str| Ok(vec!["v=spf1 -all".to_string()]));
        let mut well_known = MockWellKnownPort::new();
        well_known.expect_fetch_did().times(1).returning(|_: &str| {
            Ok(WellKnownResponse {
                status: 200,
                body: "did=did:plc:xyz".to_string(),
            })
        });

        let result = resolver(dns, well_known)
            .validate_identifier("bob.bsky.social")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bare_did_record_resolves_without_did() {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_txt_records()
            .returning(|_: &str| Ok(vec!["did=".to_string()]));

        let resolved = resolver(dns, unreachable_well_known())
            .validate_identifier("dave.bsky.social")
            .await
            .unwrap();

        assert_eq!(resolved.identifier.as_str(), "dave.bsky.social");
        assert_eq!(resolved.did, None);
    }

    #[tokio::test]
    async fn test_bare_well_known_body_is_accepted() {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_txt_records().returning(|_: &str| Ok(Vec::new()));
        let mut well_known = MockWellKnownPort::new();
        well_known.expect_fetch_did().returning(|_: &str| {
            Ok(WellKnownResponse {
                status: 200,
                body: "did=".to_string(),
            })
        });

        let result = resolver(dns, well_known)
            .resolve_handle("erin.bsky.social")
            .await;

        assert_eq!(result, Ok(String::new()));
    }

    #[test_case(404, "did=did:plc:xyz" ; "not found status")]
    #[test_case(200, "did:plc:xyz" ; "body without prefix")]
    #[test_case(200, "" ; "empty body")]
    #[tokio::test]
    async fn test_well_known_rejections(status: u16, body: &'static str) {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_txt_records().returning(|_: &str| Ok(Vec::new()));
        let mut well_known = MockWellKnownPort::new();
        well_known.expect_fetch_did().returning(move |_: &str| {
            Ok(WellKnownResponse {
                status,
                body: body.to_string(),
            })
        });

        let result = resolver(dns, well_known)
            .validate_identifier("carol.bsky.social")
            .await;

        assert_eq!(result, Err(ValidationError::HandleUnresolvable));
    }

    #[test_case("alice.alt")]
    #[test_case("alice.arpa")]
    #[test_case("alice.example")]
    #[test_case("alice.internal")]
    #[test_case("alice.invalid")]
    #[test_case("alice.local")]
    #[test_case("alice.localhost")]
    #[test_case("alice.onion")]
    #[test_case("alice.test")]
    #[tokio::test]
    async fn test_disallowed_tld_never_touches_network(handle: &str) {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_txt_records().never();
        dns.expect_mx_records().never();

        let result = resolver(dns, unreachable_well_known())
            .validate_identifier(handle)
            .await;

        assert_eq!(result, Err(ValidationError::DisallowedTld));
    }

    #[test_case("alice" ; "single label")]
    #[test_case("alice_smith.bsky.social" ; "underscore")]
    #[test_case("" ; "empty")]
    #[tokio::test]
    async fn test_malformed_handle(raw: &str) {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_txt_records().never();

        let result = resolver(dns, unreachable_well_known())
            .validate_identifier(raw)
            .await;

        assert_eq!(result, Err(ValidationError::InvalidHandle));
    }

    #[tokio::test]
    async fn test_email_with_mx_is_valid() {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_mx_records().times(1).returning(|domain: &str| {
            assert_eq!(domain, "gmail.com");
            Ok(vec!["gmail-smtp-in.l.google.com.".to_string()])
        });

        let resolved = resolver(dns, unreachable_well_known())
            .validate_identifier("alice@gmail.com")
            .await
            .unwrap();

        assert!(resolved.did.is_none());
    }

    #[tokio::test]
    async fn test_email_without_mx_is_domain_not_found() {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_mx_records().returning(|_: &str| Ok(Vec::new()));

        let result = resolver(dns, unreachable_well_known())
            .validate_identifier("alice@nowhere.invalid")
            .await;

        assert_eq!(result, Err(ValidationError::DomainNotFound));
    }

    #[tokio::test]
    async fn test_email_lookup_error_is_domain_not_found() {
        let mut dns = MockDnsResolverPort::new();
        dns.expect_mx_records()
            .returning(|domain: &str| Err(LookupError::new(domain, "NXDOMAIN")));

        let result = resolver(dns, unreachable_well_known())
            .validate_identifier("alice@no-such-domain.com")
            .await;

        assert_eq!(result, Err(ValidationError::DomainNotFound));
    }

    #[test_case("", Err(ValidationError::PasswordEmpty) ; "empty")]
    #[test_case("abcd-1234-EFGH-5678", Ok(()) ; "app password")]
    #[test_case("plainPassword123", Err(ValidationError::InvalidPassword) ; "account password")]
    #[test_case("abcd-1234-efgh-567", Err(ValidationError::InvalidPassword) ; "short group")]
    #[test_case("abcd-1234-efgh-5678-", Err(ValidationError::InvalidPassword) ; "trailing dash")]
    fn test_validate_password(password: &str, expected: Result<(), ValidationError>) {
        assert_eq!(IdentityResolver::validate_password(password), expected);
    }
}
