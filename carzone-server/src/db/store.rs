//! Store traits - the seam between services and persistence
//!
//! Postgres implementations live in `cars` and `engines`; `memory`
//! provides an in-process implementation for tests.

use async_trait::async_trait;
use uuid::Uuid;

use super::DbError;
use crate::models::{Car, CarPatch, CarRequest, Engine, EnginePatch, EngineRequest};

/// Car persistence
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Fetch one car with its engine joined in.
    async fn get_by_id(&self, id: Uuid) -> Result<Car, DbError>;

    /// All cars of a brand. `include_engine` joins the engine row.
    async fn list_by_brand(&self, brand: &str, include_engine: bool)
        -> Result<Vec<Car>, DbError>;

    /// Insert a car. The referenced engine must already exist.
    async fn create(&self, req: &CarRequest) -> Result<Car, DbError>;

    /// Apply a partial update; `updated_at` always advances.
    async fn update(&self, id: Uuid, patch: &CarPatch) -> Result<Car, DbError>;

    /// Delete a car, returning the row as it was.
    async fn delete(&self, id: Uuid) -> Result<Car, DbError>;
}

/// Engine persistence
#[async_trait]
pub trait EngineStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Engine, DbError>;

    async fn create(&self, req: &EngineRequest) -> Result<Engine, DbError>;

    /// Apply a partial update. An empty patch returns the current row.
    async fn update(&self, id: Uuid, patch: &EnginePatch) -> Result<Engine, DbError>;

    /// Delete an engine, returning the row as it was.
    ///
    /// Fails with [`DbError::Conflict`] while a car still references it.
    async fn delete(&self, id: Uuid) -> Result<Engine, DbError>;
}
