//! Gateway configuration.

use clap::Parser;
use pesca_store::{PgArgs, StoreConfig};

/// Pesquerías MX HTTP/JSON gateway command line arguments.
#[derive(Debug, Parser)]
#[command(name = "pesca-gateway")]
#[command(about = "HTTP/JSON gateway for Mexican fisheries data")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, env = "PESCA_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Serve the catalog only; production endpoints answer 503.
    #[arg(long)]
    pub offline: bool,

    /// Create the production tables at startup if they are missing.
    #[arg(long)]
    pub init_schema: bool,

    #[command(flatten)]
    pub pg: PgArgs,
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Run without the production store.
    pub offline: bool,
    /// Bootstrap the schema at startup.
    pub init_schema: bool,
    /// Production store settings.
    pub store: StoreConfig,
}

impl From<&Args> for GatewayConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            offline: args.offline,
            init_schema: args.init_schema,
            store: StoreConfig::from(&args.pg),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            offline: false,
            init_schema: false,
            store: StoreConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_args_convert_to_config() {
        let args = Args::parse_from([
            "pesca-gateway",
            "--listen",
            "127.0.0.1:3000",
            "--offline",
            "--pg-host",
            "db.internal",
            "--pg-sslmode",
            "require",
            "--pool-max-connections",
            "5",
        ]);
        let config = GatewayConfig::from(&args);
        assert_eq!(config.listen_addr, "127.0.0.1:3000");
        assert!(config.offline);
        assert_eq!(config.store.host, "db.internal");
        assert!(config.store.require_ssl);
        assert_eq!(config.store.max_connections, 5);
    }

    #[test]
    fn test_default_pool_settings() {
        let config = GatewayConfig::default();
        assert_eq!(config.store.max_connections, 20);
        assert_eq!(config.store.idle_timeout, Duration::from_secs(30));
        assert_eq!(config.store.acquire_timeout, Duration::from_secs(10));
    }
}
