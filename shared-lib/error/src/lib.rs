//! Common error types for the authentication service.
//!
//! Every failure the codec, the credential store and the two RPC operations
//! can produce lives here, so transport adapters can map them in one place.

use thiserror::Error;

/// Signing key could not be built from configuration.
///
/// Raised once at construction time; a running codec never produces it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Signing secret is empty")]
    EmptySecret,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

/// Token could not be signed.
#[derive(Debug, Error)]
#[error("Token signing failed: {0}")]
pub struct SigningError(pub String);

/// Token verification errors.
///
/// Variants carry no claim data so nothing from an untrusted token reaches
/// the caller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Token algorithm does not match")]
    AlgorithmMismatch,

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token issuer does not match")]
    IssuerMismatch,

    #[error("Token expired")]
    Expired,
}

impl VerificationError {
    /// Error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::MalformedToken => "AUTH_MALFORMED_TOKEN",
            VerificationError::AlgorithmMismatch => "AUTH_ALGORITHM_MISMATCH",
            VerificationError::SignatureMismatch => "AUTH_SIGNATURE_MISMATCH",
            VerificationError::IssuerMismatch => "AUTH_ISSUER_MISMATCH",
            VerificationError::Expired => "AUTH_TOKEN_EXPIRED",
        }
    }
}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Credential store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to load user records: {0}")]
    Load(String),

    #[error("Duplicate username: {0}")]
    DuplicateUser(String),
}

impl RepositoryError {
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::Unavailable(_) => "STORE_UNAVAILABLE",
            RepositoryError::Load(_) | RepositoryError::DuplicateUser(_) => "STORE_CORRUPT",
        }
    }
}

/// Failures of the authenticate operation.
///
/// Wrong credentials are not an error; they come back as a
/// `NotAuthenticated` outcome.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Signing(#[from] SigningError),
}

impl AuthenticationError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthenticationError::Repository(e) => e.code(),
            AuthenticationError::Signing(_) => "AUTH_SIGNING_FAILED",
        }
    }
}

/// Failures of the authorize operation.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// The presented token was rejected.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// The token is genuine but its subject is gone from the store.
    #[error("User {0} not found")]
    IdentityNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AuthorizationError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthorizationError::Verification(e) => e.code(),
            AuthorizationError::IdentityNotFound(_) => "AUTH_IDENTITY_NOT_FOUND",
            AuthorizationError::Repository(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_error_converts_into_authorization_error() {
        let err: AuthorizationError = VerificationError::SignatureMismatch.into();
        assert!(matches!(
            err,
            AuthorizationError::Verification(VerificationError::SignatureMismatch)
        ));
        assert_eq!(err.code(), "AUTH_SIGNATURE_MISMATCH");
    }

    #[test]
    fn test_identity_not_found_has_its_own_code() {
        let err = AuthorizationError::IdentityNotFound("alice".to_string());
        assert_eq!(err.code(), "AUTH_IDENTITY_NOT_FOUND");
        assert_eq!(err.to_string(), "User alice not found");
    }

    #[test]
    fn test_verification_messages_carry_no_claim_data() {
        assert_eq!(VerificationError::IssuerMismatch.to_string(), "Token issuer does not match");
        assert_eq!(VerificationError::MalformedToken.to_string(), "Malformed token");
    }
}
