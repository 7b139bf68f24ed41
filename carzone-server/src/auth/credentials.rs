//! Login credential checks

use subtle::ConstantTimeEq;

use crate::models::Credentials;

/// Source of truth for who may log in
pub trait CredentialStore: Send + Sync {
    fn verify(&self, credentials: &Credentials) -> bool;
}

/// A single username/password pair supplied through configuration
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialStore for StaticCredentials {
    fn verify(&self, credentials: &Credentials) -> bool {
        let user_ok = self
            .username
            .as_bytes()
            .ct_eq(credentials.username.as_bytes());
        let pass_ok = self
            .password
            .as_bytes()
            .ct_eq(credentials.password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
