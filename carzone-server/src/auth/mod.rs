//! Login tokens and credential checks
//!
//! The signing secret and the credential store are built by the caller
//! and handed in; nothing here reads the environment.

pub mod credentials;
pub mod jwt;

pub use credentials::{CredentialStore, StaticCredentials};
pub use jwt::{Claims, TokenIssuer};

use chrono::Duration;

/// Token signing configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens
    pub secret: String,
    /// Lifetime of an issued token
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::hours(24),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}
