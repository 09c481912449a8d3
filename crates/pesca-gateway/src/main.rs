//! Pesquerías MX HTTP/JSON Gateway binary.

use std::sync::Arc;

use clap::Parser;
use pesca_core::Catalog;
use pesca_gateway::{create_router, AppState, Args, GatewayConfig};
use pesca_store::{ProductionSource, ProductionStore};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pesca_gateway=info,pesca_store=info,tower_http=info")),
        )
        .init();

    // Parse command line args
    let args = Args::parse();
    let config = GatewayConfig::from(&args);

    info!(
        listen = %config.listen_addr,
        offline = config.offline,
        "Starting Pesquerías MX Gateway"
    );

    let catalog = Catalog::load()?;

    let production: Option<Arc<dyn ProductionSource>> = if config.offline {
        info!("Offline mode: production endpoints disabled");
        None
    } else {
        let store = ProductionStore::connect_lazy(&config.store);
        if config.init_schema {
            store.ensure_schema().await?;
        }
        match store.ping().await {
            Ok(()) => info!("Connected to production database"),
            Err(err) => warn!(error = %err, "Production database unreachable; continuing degraded"),
        }
        Some(Arc::new(store))
    };

    // Create application state
    let state = AppState::new(catalog, production, config.clone());

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
