//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. Startup connects
//! through [`connect_with_retry`] so the server can come up alongside a
//! database container that is still booting.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use super::DbError;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings, usually read from `DB_*` environment variables.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// Upper bound for a single connection attempt
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// How often and how patiently to retry the initial connection.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(2),
        }
    }
}

/// Create a PostgreSQL connection pool from a URL.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/carzone").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Connect to PostgreSQL, retrying with a fixed interval.
///
/// Each attempt opens the pool and pings it. Returns the last error once
/// `policy.max_attempts` attempts have failed.
pub async fn connect_with_retry(config: &DbConfig, policy: RetryPolicy) -> Result<PgPool, DbError> {
    let options = config.connect_options();
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => {
                tracing::info!(
                    host = %config.host,
                    port = config.port,
                    database = %config.database,
                    attempt,
                    "connected to database"
                );
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                tracing::warn!(
                    attempt,
                    error = %e,
                    "could not connect to database, retrying in {:?}",
                    policy.interval
                );
                tokio::time::sleep(policy.interval).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(attempts, error = %e, "giving up on database connection");
                return Err(DbError::Sqlx(e));
            }
        }
    }
}
