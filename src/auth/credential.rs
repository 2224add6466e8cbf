//! Access-token lifecycle state.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use crate::config::EXPIRY_SAFETY_MARGIN_SECS;

/// An access token together with the instant it stops being usable.
///
/// The expiry already includes the safety margin: it is provider TTL minus
/// [`EXPIRY_SAFETY_MARGIN_SECS`], applied at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Opaque bearer token for the backend API.
    pub access_token: String,
    /// Instant after which the token is treated as expired.
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// SHA-256 hex digest of the token value. Used to pair a backend session
    /// with the credential that produced it.
    pub fn fingerprint(&self) -> String {
        let hash = Sha256::digest(self.access_token.as_bytes());
        hash.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// The current credential held by a client instance.
///
/// Token and expiry travel together inside [`IssuedToken`], so they are
/// either both present or both absent. The whole value is replaced on every
/// successful exchange, never mutated field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    token: Option<IssuedToken>,
    refresh_token: Option<String>,
}

impl Credential {
    /// An empty credential, as held by a freshly constructed client.
    pub fn new() -> Self {
        Self::default()
    }

    /// A credential with an explicit expiry instant. Useful for restoring
    /// previously issued tokens.
    pub fn with_expiry(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: Some(IssuedToken {
                access_token: access_token.into(),
                expires_at,
            }),
            refresh_token,
        }
    }

    /// A credential holding only a refresh token. Note the next
    /// authentication cycle performs a fresh login, not a refresh: the
    /// refresh grant is reserved for tokens that were issued and expired.
    pub fn from_refresh_token(refresh_token: impl Into<String>) -> Self {
        Self {
            token: None,
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// A credential built from a provider-reported TTL. The stored expiry is
    /// `now + ttl - safety margin`.
    pub fn from_provider_ttl(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        ttl_seconds: i64,
    ) -> Self {
        let expires_at =
            Utc::now() + Duration::seconds(ttl_seconds - EXPIRY_SAFETY_MARGIN_SECS);
        Self::with_expiry(access_token, refresh_token, expires_at)
    }

    /// True iff a token is held and the current time is strictly before its
    /// expiry.
    pub fn is_fresh(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|t| Utc::now() < t.expires_at)
    }

    /// True iff a token is held but no longer fresh. Distinct from an unset
    /// credential: expiry selects the refresh-grant path, absence selects a
    /// fresh login.
    pub fn is_expired(&self) -> bool {
        self.token.is_some() && !self.is_fresh()
    }

    /// The issued token, if any.
    pub fn token(&self) -> Option<&IssuedToken> {
        self.token.as_ref()
    }

    /// The access token value, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.access_token.as_str())
    }

    /// The expiry instant, if a token is held.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.as_ref().map(|t| t.expires_at)
    }

    /// The refresh token, if any.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credential_is_not_fresh() {
        let credential = Credential::new();
        assert!(!credential.is_fresh());
        assert!(!credential.is_expired());
        assert!(credential.access_token().is_none());
        assert!(credential.expires_at().is_none());
    }

    #[test]
    fn test_fresh_credential() {
        let credential =
            Credential::with_expiry("tok", None, Utc::now() + Duration::minutes(10));
        assert!(credential.is_fresh());
        assert!(!credential.is_expired());
        assert_eq!(credential.access_token(), Some("tok"));
    }

    #[test]
    fn test_expired_credential() {
        let credential =
            Credential::with_expiry("tok", Some("refresh".into()), Utc::now() - Duration::minutes(10));
        assert!(!credential.is_fresh());
        assert!(credential.is_expired());
        assert_eq!(credential.refresh_token(), Some("refresh"));
    }

    #[test]
    fn test_expiry_boundary_is_not_fresh() {
        let credential = Credential::with_expiry("tok", None, Utc::now());
        assert!(!credential.is_fresh());
    }

    #[test]
    fn test_provider_ttl_applies_safety_margin() {
        let before = Utc::now();
        let credential = Credential::from_provider_ttl("tok", None, 1234);
        let after = Utc::now();

        let expires_at = credential.expires_at().unwrap();
        assert!(expires_at >= before + Duration::seconds(1224));
        assert!(expires_at <= after + Duration::seconds(1224));
    }

    #[test]
    fn test_fingerprint_tracks_token_value() {
        let a = Credential::with_expiry("tok-a", None, Utc::now());
        let b = Credential::with_expiry("tok-b", None, Utc::now());
        let a2 = Credential::with_expiry("tok-a", None, Utc::now() + Duration::hours(1));

        let fp = |c: &Credential| c.token().unwrap().fingerprint();
        assert_ne!(fp(&a), fp(&b));
        assert_eq!(fp(&a), fp(&a2));
        assert_eq!(fp(&a).len(), 64);
    }
}
