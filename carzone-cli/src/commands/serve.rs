//! HTTP server command
//!
//! Connects to PostgreSQL (with retry), applies the schema file and runs
//! the carzone API until Ctrl+C/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::Parser;

use carzone_server::db::{apply_schema_file, connect_with_retry};
use carzone_server::http::{run_server, ServerConfig};
use carzone_server::{AuthConfig, DbConfig, RetryPolicy, StaticCredentials};

const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// PostgreSQL host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// PostgreSQL port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// PostgreSQL user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// PostgreSQL password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// PostgreSQL database name
    #[arg(long, env = "DB_NAME", default_value = "postgres")]
    pub db_name: String,

    /// Secret used to sign and verify login tokens
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Username accepted by /login
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub admin_username: String,

    /// Password accepted by /login
    #[arg(
        long,
        env = "ADMIN_PASSWORD",
        default_value = DEFAULT_ADMIN_PASSWORD,
        hide_env_values = true
    )]
    pub admin_password: String,

    /// SQL file executed at startup to create the tables
    #[arg(long, env = "SCHEMA_FILE", default_value = "schema.sql")]
    pub schema: PathBuf,

    /// Per-request timeout for database work, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 100)]
    pub request_timeout: u64,
}

impl ServeArgs {
    fn db_config(&self) -> DbConfig {
        DbConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            ..DbConfig::default()
        }
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.request_timeout),
            auth: AuthConfig::new(self.secret_key.clone()),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    ensure!(!args.secret_key.trim().is_empty(), "SECRET_KEY must not be empty");
    ensure!(args.request_timeout > 0, "--request-timeout must be at least 1 second");

    let db_config = args.db_config();
    tracing::info!(host = %db_config.host, port = db_config.port, "Connecting to database");

    let pool = connect_with_retry(&db_config, RetryPolicy::default())
        .await
        .context("Failed to connect to database")?;

    apply_schema_file(&pool, &args.schema)
        .await
        .with_context(|| format!("Failed to apply schema {}", args.schema.display()))?;
    tracing::info!(path = %args.schema.display(), "Schema applied");

    if args.admin_password == DEFAULT_ADMIN_PASSWORD {
        tracing::warn!("ADMIN_PASSWORD not set, using the default login password");
    }
    let credentials = Arc::new(StaticCredentials::new(
        args.admin_username.clone(),
        args.admin_password.clone(),
    ));

    let config = args.server_config();
    tracing::info!("Starting carzone server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(pool, credentials, config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> ServeArgs {
        let mut argv = vec!["serve", "--secret-key", "s3cret"];
        argv.extend_from_slice(extra);
        ServeArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_map_onto_db_config() {
        let args = parse(&["--db-host", "db", "--db-port", "6543", "--db-name", "cars"]);
        let cfg = args.db_config();
        assert_eq!(cfg.host, "db");
        assert_eq!(cfg.port, 6543);
        assert_eq!(cfg.database, "cars");
        assert_eq!(cfg.max_connections, DbConfig::default().max_connections);
    }

    #[test]
    fn server_config_carries_timeout_and_secret() {
        let args = parse(&["--request-timeout", "7", "--bind", "127.0.0.1:9000"]);
        let cfg = args.server_config();
        assert_eq!(cfg.request_timeout, Duration::from_secs(7));
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.auth.secret, "s3cret");
    }
}
