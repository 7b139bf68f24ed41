//! Database layer - connection pool, schema and stores
//!
//! # Design Principles
//!
//! - One shared pool per process, no Arc<Mutex<Connection>>
//! - Every write runs in its own transaction; an early `?` drops the
//!   transaction, which rolls it back
//! - Rely on DB constraints for references, map violations to `DbError`
//! - Absent rows are `DbError::NotFound`, never a zero-valued record

pub mod cars;
pub mod engines;
pub mod error;
pub mod memory;
pub mod pool;
pub mod schema;
pub mod store;
pub mod update;

pub use cars::PgCarStore;
pub use engines::PgEngineStore;
pub use error::DbError;
pub use memory::InMemoryStore;
pub use pool::{connect_with_retry, create_pool, DbConfig, RetryPolicy};
pub use schema::{apply_schema_file, SchemaError};
pub use store::{CarStore, EngineStore};
pub use update::UpdateBuilder;
