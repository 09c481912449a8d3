//! Connection settings.

use std::time::Duration;

use clap::Args;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// PostgreSQL connection and pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Require TLS (`PGSSLMODE=require`). Certificates are not verified.
    pub require_ssl: bool,
    pub max_connections: u32,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "fisheries".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            require_ssl: false,
            max_connections: 20,
            idle_timeout: Duration::from_secs(30),
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl StoreConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        };
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(ssl_mode)
    }
}

/// Database arguments shared by every binary, with the standard `PG*`
/// environment fallbacks.
#[derive(Debug, Clone, Args)]
pub struct PgArgs {
    /// PostgreSQL host.
    #[arg(long, env = "PGHOST", default_value = "localhost", global = true)]
    pub pg_host: String,

    /// PostgreSQL port.
    #[arg(long, env = "PGPORT", default_value_t = 5432, global = true)]
    pub pg_port: u16,

    /// PostgreSQL database.
    #[arg(long, env = "PGDATABASE", default_value = "fisheries", global = true)]
    pub pg_database: String,

    /// PostgreSQL user.
    #[arg(long, env = "PGUSER", default_value = "postgres", global = true)]
    pub pg_user: String,

    /// PostgreSQL password.
    #[arg(
        long,
        env = "PGPASSWORD",
        default_value = "postgres",
        hide_env_values = true,
        global = true
    )]
    pub pg_password: String,

    /// PostgreSQL SSL mode; only `require` enables TLS.
    #[arg(long, env = "PGSSLMODE", global = true)]
    pub pg_sslmode: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, default_value_t = 20, global = true)]
    pub pool_max_connections: u32,

    /// Idle timeout (ms) after which pooled connections are closed.
    #[arg(long, default_value_t = 30_000, global = true)]
    pub pool_idle_timeout_ms: u64,

    /// Timeout (ms) when acquiring a pooled connection.
    #[arg(long, default_value_t = 10_000, global = true)]
    pub pool_acquire_timeout_ms: u64,
}

impl From<&PgArgs> for StoreConfig {
    fn from(args: &PgArgs) -> Self {
        Self {
            host: args.pg_host.clone(),
            port: args.pg_port,
            database: args.pg_database.clone(),
            user: args.pg_user.clone(),
            password: args.pg_password.clone(),
            require_ssl: args.pg_sslmode.as_deref() == Some("require"),
            max_connections: args.pool_max_connections,
            idle_timeout: Duration::from_millis(args.pool_idle_timeout_ms),
            acquire_timeout: Duration::from_millis(args.pool_acquire_timeout_ms),
        }
    }
}
