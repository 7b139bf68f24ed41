//! Domain models and request bodies
//!
//! Create requests carry every field. Patch types track presence with
//! `Option` so an absent field is never confused with a zero value.

pub mod car;
pub mod engine;
pub mod validation;

pub use car::{Car, CarPatch, CarRequest};
pub use engine::{Engine, EnginePatch, EngineRequest};
pub use validation::ValidationError;

use serde::{Deserialize, Serialize};

/// Login body. Only lives for the duration of a login request.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
