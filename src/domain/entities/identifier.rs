//! Login identifier classification.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Invalid regex")
});

static HANDLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$",
    )
    .expect("Invalid regex")
});

/// Top-level domains that can never host a handle.
pub const DISALLOWED_SUFFIXES: [&str; 9] = [
    ".alt",
    ".arpa",
    ".example",
    ".internal",
    ".invalid",
    ".local",
    ".localhost",
    ".onion",
    ".test",
];

/// Shape of a login identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// Account e-mail address.
    Email,
    /// Domain-name handle.
    Handle,
}

/// Login identifier as typed by the user, classified once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    value: String,
    kind: IdentifierKind,
}

impl Identifier {
    /// Classifies raw input. Handles are lower-cased, e-mails kept verbatim.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if EMAIL_REGEX.is_match(raw) {
            Self {
                value: raw.to_string(),
                kind: IdentifierKind::Email,
            }
        } else {
            Self {
                value: raw.to_ascii_lowercase(),
                kind: IdentifierKind::Handle,
            }
        }
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the classification.
    #[must_use]
    pub const fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// Returns the part after `@` for e-mail identifiers.
    #[must_use]
    pub fn email_domain(&self) -> Option<&str> {
        match self.kind {
            IdentifierKind::Email => self.value.rsplit_once('@').map(|(_, domain)| domain),
            IdentifierKind::Handle => None,
        }
    }

    /// Returns whether a handle satisfies the multi-label hostname grammar.
    #[must_use]
    pub fn is_well_formed_handle(&self) -> bool {
        self.kind == IdentifierKind::Handle && HANDLE_REGEX.is_match(&self.value)
    }

    /// Returns the reserved suffix the handle ends in, if any.
    #[must_use]
    pub fn disallowed_suffix(&self) -> Option<&'static str> {
        DISALLOWED_SUFFIXES
            .iter()
            .copied()
            .find(|suffix| self.value.ends_with(suffix))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("alice@example.com" ; "plain address")]
    #[test_case("first.last+tag@mail.co.uk" ; "subaddress")]
    fn test_email_classification(raw: &str) {
        let id = Identifier::parse(raw);
        assert_eq!(id.kind(), IdentifierKind::Email);
    }

    #[test]
    fn test_email_domain() {
        let id = Identifier::parse("alice@bsky.app");
        assert_eq!(id.email_domain(), Some("bsky.app"));
    }

    #[test]
    fn test_handle_is_lowercased() {
        let id = Identifier::parse("  Alice.BSKY.Social ");
        assert_eq!(id.kind(), IdentifierKind::Handle);
        assert_eq!(id.as_str(), "alice.bsky.social");
        assert!(id.email_domain().is_none());
    }

    #[test_case("alice.bsky.social", true ; "three labels")]
    #[test_case("a-b.example.com", true ; "hyphen inside label")]
    #[test_case("alice", false ; "single label")]
    #[test_case("-alice.bsky.social", false ; "leading hyphen")]
    #[test_case("alice.bsky.123", false ; "numeric tld")]
    #[test_case("alice..social", false ; "empty label")]
    #[test_case("", false ; "empty")]
    fn test_handle_grammar(raw: &str, expected: bool) {
        assert_eq!(Identifier::parse(raw).is_well_formed_handle(), expected);
    }

    #[test]
    fn test_label_length_limit() {
        let ok = format!("{}.com", "a".repeat(63));
        let too_long = format!("{}.com", "a".repeat(64));
        assert!(Identifier::parse(&ok).is_well_formed_handle());
        assert!(!Identifier::parse(&too_long).is_well_formed_handle());
    }

    #[test]
    fn test_disallowed_suffix_detection() {
        assert_eq!(
            Identifier::parse("alice.onion").disallowed_suffix(),
            Some(".onion")
        );
        assert_eq!(Identifier::parse("alice.bsky.social").disallowed_suffix(), None);
    }
}
