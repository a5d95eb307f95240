//! Identity claims carried inside a token.

use serde::{Deserialize, Serialize};

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp), present only when expiry is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Create claims for a subject. With `expires_in_secs` set, the claims
    /// are stamped with `iat`/`exp` relative to `now`.
    pub fn new(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        expires_in_secs: Option<i64>,
        now: i64,
    ) -> Self {
        Self {
            iss: issuer.into(),
            sub: subject.into(),
            iat: expires_in_secs.map(|_| now),
            exp: expires_in_secs.map(|ttl| now.saturating_add(ttl)),
        }
    }

    /// Check if the claims have expired at `now`. Claims without `exp` never expire.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| now > exp)
    }

    /// Check if the claims have expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_without_ttl_have_no_time_fields() {
        let claims = Claims::new("alice", "issuer", None, 1_700_000_000);
        assert_eq!(claims.iat, None);
        assert_eq!(claims.exp, None);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_with_ttl() {
        let claims = Claims::new("alice", "issuer", Some(60), 1_000);
        assert_eq!(claims.iat, Some(1_000));
        assert_eq!(claims.exp, Some(1_060));
        assert!(!claims.is_expired_at(1_060));
        assert!(claims.is_expired_at(1_061));
    }
}
