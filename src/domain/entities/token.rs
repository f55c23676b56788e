//! Session JSON Web Tokens.

use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<f64>,
}

/// Opaque JWT as issued by the PDS.
///
/// Claims are read without verifying the signature. The token is only ever
/// checked for expiry locally; the server remains the authority on validity.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Jwt {
    value: String,
}

impl Jwt {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns whether the token string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns the `exp` claim as an instant, if present and parseable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut segments = self.value.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };

        let bytes = general_purpose::URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        let claims: ExpiryClaims = serde_json::from_slice(&bytes).ok()?;

        let exp = claims.exp?;
        if !exp.is_finite() {
            return None;
        }
        // Fractional seconds are dropped.
        #[allow(clippy::cast_possible_truncation)]
        DateTime::from_timestamp(exp as i64, 0)
    }

    /// Returns whether the token is expired now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns whether the token is expired at `now`. A missing or malformed
    /// `exp` counts as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_none_or(|exp| exp <= now)
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 {
            return "*".repeat(self.value.len());
        }

        let visible_prefix = &self.value[..4];
        let visible_suffix = &self.value[self.value.len() - 4..];
        format!("{visible_prefix}...{visible_suffix}")
    }
}

impl fmt::Debug for Jwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwt").field("value", &self.masked()).finish()
    }
}

impl fmt::Display for Jwt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// Access and refresh token, always replaced together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived token for API calls.
    pub access: Jwt,
    /// Long-lived token used only to mint new pairs.
    pub refresh: Jwt,
}

impl TokenPair {
    /// Creates token pair.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: Jwt::new(access),
            refresh: Jwt::new(refresh),
        }
    }
}

/// Helpers for minting unsigned-looking test tokens.
#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicU64, Ordering};

    use chrono::{TimeDelta, Utc};
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    use super::Jwt;

    static NEXT_ID: AtomicU64 = AtomicU64::new(1);

    /// Mints a token whose `exp` lies `delta` from now.
    pub fn jwt_expiring_in(delta: TimeDelta) -> Jwt {
        let claims = json!({
            "scope": "com.atproto.access",
            "sub": "did:plc:test",
            "exp": (Utc::now() + delta).timestamp(),
            "jti": NEXT_ID.fetch_add(1, Ordering::Relaxed),
        });
        encode(&claims)
    }

    /// Mints a token without an `exp` claim.
    pub fn jwt_without_exp() -> Jwt {
        encode(&json!({ "sub": "did:plc:test" }))
    }

    fn encode(claims: &serde_json::Value) -> Jwt {
        let token = jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("encode test token");
        Jwt::new(token)
    }
}
