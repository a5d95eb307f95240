//! Authentication service
//!
//! The authenticate and authorize operations, independent of transport.

use std::sync::Arc;

use auth::TokenCodec;
use error::{AuthenticationError, AuthorizationError};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::repository::UserRepository;

/// Result of a credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    Authenticated { token: String },
    NotAuthenticated,
}

/// Credential verification and token-to-roles resolution.
#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(repository: Arc<dyn UserRepository>, codec: Arc<TokenCodec>) -> Self {
        Self { repository, codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Check a username/password pair and issue a token on match.
    ///
    /// Unknown users and wrong passwords yield `NotAuthenticated`; only
    /// store or signing failures are errors.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationOutcome, AuthenticationError> {
        let user = self.repository.find_user(username).await?;

        let matched = match &user {
            Some(user) => passwords_match(&user.password, password),
            None => false,
        };

        if !matched {
            tracing::info!("Authentication failed for {}", username);
            return Ok(AuthenticationOutcome::NotAuthenticated);
        }

        let token = self.codec.issue(username)?;
        tracing::info!("Authenticated {}", username);
        Ok(AuthenticationOutcome::Authenticated { token })
    }

    /// Verify a token and return the roles of the user it names.
    pub async fn authorize(&self, token: &str) -> Result<Vec<String>, AuthorizationError> {
        let claims = self.codec.verify(token)?;

        let user = self
            .repository
            .find_user(&claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::error!("Verified token names missing user {}", claims.sub);
                AuthorizationError::IdentityNotFound(claims.sub.clone())
            })?;

        tracing::debug!("Authorized {} with {} roles", user.username, user.roles.len());
        Ok(user.roles)
    }
}

/// Constant-time password comparison. Both sides are hashed first so the
/// comparison runs over equal-length inputs.
fn passwords_match(stored: &str, presented: &str) -> bool {
    let stored = Sha256::digest(stored.as_bytes());
    let presented = Sha256::digest(presented.as_bytes());
    stored.as_slice().ct_eq(presented.as_slice()).into()
}
