//! Business logic layer
//!
//! One service per entity. Car operations delegate straight to the store;
//! engine writes are validated first and never reach the store when
//! validation fails.

pub mod cars;
pub mod engines;

pub use cars::CarService;
pub use engines::EngineService;

use crate::db::DbError;
use crate::models::ValidationError;

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
