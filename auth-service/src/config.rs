use std::fmt;
use std::path::PathBuf;

use auth::{Algorithm, JwtConfig};
use error::KeyError;

/// Authentication service configuration
#[derive(Clone)]
pub struct AuthServiceConfig {
    /// gRPC server address
    pub grpc_addr: String,

    /// HMAC secret for signing tokens
    pub secret: String,

    /// Issuer written into and required from every token
    pub issuer: String,

    /// Signing algorithm name (HS256, HS384, HS512)
    pub algorithm: String,

    /// Token lifetime in seconds; unset issues tokens without expiry
    pub token_ttl_secs: Option<i64>,

    /// JSON file with the user records to serve
    pub users_file: Option<PathBuf>,

    /// Service version
    pub version: String,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            grpc_addr: "[::1]:50051".to_string(),
            secret: String::new(),
            issuer: "auth-service".to_string(),
            algorithm: Algorithm::default().to_string(),
            token_ttl_secs: None,
            users_file: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl AuthServiceConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("GRPC_ADDR") {
            config.grpc_addr = addr;
        }

        if let Some(secret) = lookup("JWT_SECRET") {
            config.secret = secret;
        }

        if let Some(issuer) = lookup("JWT_ISSUER") {
            config.issuer = issuer;
        }

        if let Some(algorithm) = lookup("JWT_ALGORITHM") {
            config.algorithm = algorithm;
        }

        if let Some(ttl) = lookup("TOKEN_TTL_SECS") {
            match ttl.parse::<i64>() {
                Ok(n) if n > 0 => config.token_ttl_secs = Some(n),
                _ => tracing::warn!("Ignoring invalid TOKEN_TTL_SECS: {}", ttl),
            }
        }

        if let Some(path) = lookup("USERS_FILE") {
            config.users_file = Some(PathBuf::from(path));
        }

        config
    }

    /// Signing context for the token codec
    pub fn jwt_config(&self) -> Result<JwtConfig, KeyError> {
        let mut jwt = JwtConfig::new(self.secret.clone(), self.issuer.clone())
            .with_algorithm(self.algorithm.parse()?);
        jwt.expires_in_secs = self.token_ttl_secs;
        Ok(jwt)
    }
}

impl fmt::Debug for AuthServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthServiceConfig")
            .field("grpc_addr", &self.grpc_addr)
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("users_file", &self.users_file)
            .field("version", &self.version)
            .finish()
    }
}
