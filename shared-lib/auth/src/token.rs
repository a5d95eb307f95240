//! JWT signing and verification.

use std::fmt;
use std::str::FromStr;

use error::{KeyError, SigningError, VerificationError};
use hmac::{Hmac, Mac};
use jwt::{
    AlgorithmType, Header, SignWithKey, SigningAlgorithm, Token, Unverified, Verified, VerifyWithKey,
    VerifyingAlgorithm,
};
use sha2::{Sha256, Sha384, Sha512};

use crate::claims::Claims;

/// HMAC signing algorithms accepted for tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Hs256,
    Hs384,
    Hs512,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Hs256 => "HS256",
            Algorithm::Hs384 => "HS384",
            Algorithm::Hs512 => "HS512",
        }
    }

    fn algorithm_type(&self) -> AlgorithmType {
        match self {
            Algorithm::Hs256 => AlgorithmType::Hs256,
            Algorithm::Hs384 => AlgorithmType::Hs384,
            Algorithm::Hs512 => AlgorithmType::Hs512,
        }
    }
}

impl FromStr for Algorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(Algorithm::Hs256),
            "HS384" => Ok(Algorithm::Hs384),
            "HS512" => Ok(Algorithm::Hs512),
            _ => Err(KeyError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT configuration.
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token issuer
    pub issuer: String,
    /// Signing algorithm
    pub algorithm: Algorithm,
    /// Token validity duration in seconds; `None` issues tokens without `exp`
    pub expires_in_secs: Option<i64>,
}

impl JwtConfig {
    /// Create a new JWT configuration using HS256 and no expiry.
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            algorithm: Algorithm::default(),
            expires_in_secs: None,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_expiry(mut self, expires_in_secs: i64) -> Self {
        self.expires_in_secs = Some(expires_in_secs);
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

enum SigningKey {
    Hs256(Hmac<Sha256>),
    Hs384(Hmac<Sha384>),
    Hs512(Hmac<Sha512>),
}

impl SigningKey {
    fn new(algorithm: Algorithm, secret: &[u8]) -> Result<Self, KeyError> {
        let invalid = |e: hmac::digest::InvalidLength| KeyError::InvalidKey(e.to_string());
        Ok(match algorithm {
            Algorithm::Hs256 => SigningKey::Hs256(Hmac::new_from_slice(secret).map_err(invalid)?),
            Algorithm::Hs384 => SigningKey::Hs384(Hmac::new_from_slice(secret).map_err(invalid)?),
            Algorithm::Hs512 => SigningKey::Hs512(Hmac::new_from_slice(secret).map_err(invalid)?),
        })
    }

    fn algorithm(&self) -> Algorithm {
        match self {
            SigningKey::Hs256(_) => Algorithm::Hs256,
            SigningKey::Hs384(_) => Algorithm::Hs384,
            SigningKey::Hs512(_) => Algorithm::Hs512,
        }
    }
}

impl SigningAlgorithm for SigningKey {
    fn algorithm_type(&self) -> AlgorithmType {
        self.algorithm().algorithm_type()
    }

    fn sign(&self, header: &str, claims: &str) -> Result<String, jwt::Error> {
        match self {
            SigningKey::Hs256(mac) => mac.sign(header, claims),
            SigningKey::Hs384(mac) => mac.sign(header, claims),
            SigningKey::Hs512(mac) => mac.sign(header, claims),
        }
    }
}

// Tag comparison happens inside jwt's `VerifyingAlgorithm` impl for `Hmac`,
// which calls the constant-time `Mac::verify_slice`.
impl VerifyingAlgorithm for SigningKey {
    fn algorithm_type(&self) -> AlgorithmType {
        self.algorithm().algorithm_type()
    }

    fn verify_bytes(&self, header: &str, claims: &str, signature: &[u8]) -> Result<bool, jwt::Error> {
        match self {
            SigningKey::Hs256(mac) => mac.verify_bytes(header, claims, signature),
            SigningKey::Hs384(mac) => mac.verify_bytes(header, claims, signature),
            SigningKey::Hs512(mac) => mac.verify_bytes(header, claims, signature),
        }
    }
}

/// Signs and verifies identity tokens under one signing context.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct TokenCodec {
    key: SigningKey,
    issuer: String,
    expires_in_secs: Option<i64>,
}

impl TokenCodec {
    /// Build a codec from configuration. Fails when the key is unusable.
    pub fn new(config: &JwtConfig) -> Result<Self, KeyError> {
        if config.secret.is_empty() {
            return Err(KeyError::EmptySecret);
        }

        let key = SigningKey::new(config.algorithm, config.secret.as_bytes()).map_err(|e| {
            tracing::error!("Failed to create HMAC key: {}", e);
            e
        })?;

        Ok(Self {
            key,
            issuer: config.issuer.clone(),
            expires_in_secs: config.expires_in_secs,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn algorithm(&self) -> Algorithm {
        self.key.algorithm()
    }

    /// Issue a signed token for `subject`.
    pub fn issue(&self, subject: &str) -> Result<String, SigningError> {
        let claims = Claims::new(
            subject,
            self.issuer.as_str(),
            self.expires_in_secs,
            chrono::Utc::now().timestamp(),
        );
        self.sign(claims)
    }

    fn sign(&self, claims: Claims) -> Result<String, SigningError> {
        claims.sign_with_key(&self.key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            SigningError(e.to_string())
        })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<Claims, VerificationError> {
        let verified: Token<Header, Claims, Verified> =
            token.verify_with_key(&self.key).map_err(|e| {
                let kind = classify(token, &e);
                tracing::warn!("Token rejected: {}", kind);
                kind
            })?;
        let claims = verified.claims();

        if claims.iss != self.issuer {
            tracing::warn!("Token rejected: {}", VerificationError::IssuerMismatch);
            return Err(VerificationError::IssuerMismatch);
        }

        if claims.is_expired_at(now) {
            tracing::debug!("Token rejected: {}", VerificationError::Expired);
            return Err(VerificationError::Expired);
        }

        Ok(claims.clone())
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("algorithm", &self.key.algorithm())
            .field("expires_in_secs", &self.expires_in_secs)
            .finish_non_exhaustive()
    }
}

fn classify(token: &str, err: &jwt::Error) -> VerificationError {
    match err {
        jwt::Error::InvalidSignature | jwt::Error::RustCryptoMac(_) => {
            VerificationError::SignatureMismatch
        }
        jwt::Error::AlgorithmMismatch(..) => VerificationError::AlgorithmMismatch,
        _ if signed_part_parses(token) => VerificationError::SignatureMismatch,
        _ => VerificationError::MalformedToken,
    }
}

/// Header and claims decode cleanly, so any remaining failure lies in the
/// signature segment (everything after the second dot).
fn signed_part_parses(token: &str) -> bool {
    let mut parts = token.splitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(claims), Some(_)) => {
            let signed_part = format!("{}.{}.", header, claims);
            Token::<Header, Claims, Unverified<'_>>::parse_unverified(&signed_part).is_ok()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: &str, issuer: &str) -> TokenCodec {
        TokenCodec::new(&JwtConfig::new(secret, issuer)).expect("Failed to build codec")
    }

    #[test]
    fn test_encode_decode_token() {
        let codec = codec("test-secret-key", "test-issuer");

        let token = codec.issue("user123").expect("Failed to encode");
        let decoded = codec.verify(&token).expect("Failed to decode");

        assert_eq!(decoded.sub, "user123");
        assert_eq!(decoded.iss, "test-issuer");
        assert_eq!(decoded.exp, None);
    }

    #[test]
    fn test_token_is_compact_jwt() {
        let token = codec("secret", "issuer").issue("alice").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let token = codec("secret", "A").issue("alice").unwrap();
        let result = codec("secret", "B").verify(&token);
        assert_eq!(result, Err(VerificationError::IssuerMismatch));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = codec("secret-one", "issuer").issue("alice").unwrap();
        let result = codec("secret-two", "issuer").verify(&token);
        assert_eq!(result, Err(VerificationError::SignatureMismatch));
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let hs512 = TokenCodec::new(&JwtConfig::new("secret", "issuer").with_algorithm(Algorithm::Hs512)).unwrap();
        let token = hs512.issue("alice").unwrap();

        let result = codec("secret", "issuer").verify(&token);
        assert_eq!(result, Err(VerificationError::AlgorithmMismatch));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let codec = codec("secret", "issuer");
        for token in ["", "not-a-token", "a.b", "a.b.c", "a.b.c.d"] {
            assert_eq!(codec.verify(token), Err(VerificationError::MalformedToken), "token {:?}", token);
        }
    }

    #[test]
    fn test_corrupted_signature_segment_rejected_as_mismatch() {
        let codec = codec("secret", "issuer");
        let token = codec.issue("alice").unwrap();
        let (signed_part, signature) = token.rsplit_once('.').unwrap();

        for corrupted in [
            format!("{}.!{}", signed_part, &signature[1..]),
            format!("{}.{}.{}", signed_part, &signature[..10], &signature[10..]),
            format!("{}.", signed_part),
        ] {
            assert_eq!(
                codec.verify(&corrupted),
                Err(VerificationError::SignatureMismatch),
                "token {:?}",
                corrupted
            );
        }
    }

    #[test]
    fn test_corrupted_claims_segment_rejected_as_malformed() {
        let codec = codec("secret", "issuer");
        let token = codec.issue("alice").unwrap();
        let (header, rest) = token.split_once('.').unwrap();
        let (_, signature) = rest.split_once('.').unwrap();

        let corrupted = format!("{}.!!!.{}", header, signature);
        assert_eq!(codec.verify(&corrupted), Err(VerificationError::MalformedToken));
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(&JwtConfig::new("secret", "issuer").with_expiry(60)).unwrap();
        let token = codec.sign(Claims::new("alice", "issuer", Some(60), 1_000)).unwrap();

        assert_eq!(codec.verify_at(&token, 1_061), Err(VerificationError::Expired));
        assert_eq!(codec.verify_at(&token, 1_030).unwrap().sub, "alice");
    }

    #[test]
    fn test_issue_with_expiry_sets_time_claims() {
        let codec = TokenCodec::new(&JwtConfig::new("secret", "issuer").with_expiry(3600)).unwrap();
        let claims = codec.verify(&codec.issue("alice").unwrap()).unwrap();

        let iat = claims.iat.expect("iat missing");
        assert_eq!(claims.exp, Some(iat + 3600));
    }

    #[test]
    fn test_empty_secret_is_fatal() {
        let result = TokenCodec::new(&JwtConfig::new("", "issuer"));
        assert!(matches!(result, Err(KeyError::EmptySecret)));
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("HS256".parse::<Algorithm>().unwrap(), Algorithm::Hs256);
        assert_eq!("hs384".parse::<Algorithm>().unwrap(), Algorithm::Hs384);
        assert_eq!(" HS512 ".parse::<Algorithm>().unwrap(), Algorithm::Hs512);
        assert!(matches!(
            "RS256".parse::<Algorithm>(),
            Err(KeyError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new("super-secret", "issuer");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
