//! Pesquerías MX HTTP/JSON Gateway.
//!
//! Serves the embedded fisheries catalog (species, regulatory documents,
//! closed seasons) and, when a database is configured, production
//! statistics over landing records.

pub mod config;
pub mod error;
pub mod json;
pub mod params;
pub mod routes;

pub use config::{Args, GatewayConfig};
pub use error::AppError;

use std::sync::Arc;

use axum::Router;
use pesca_core::Catalog;
use pesca_store::ProductionSource;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Immutable catalog.
    pub catalog: Arc<Catalog>,
    /// Production store; `None` when running offline.
    pub production: Option<Arc<dyn ProductionSource>>,
    /// Gateway configuration.
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        catalog: Catalog,
        production: Option<Arc<dyn ProductionSource>>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            production,
            config,
        }
    }

    /// The production store, or 503 when none is configured.
    pub fn production(&self) -> Result<&dyn ProductionSource, AppError> {
        self.production
            .as_deref()
            .ok_or_else(|| AppError::Unavailable("Base de datos no configurada".to_string()))
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::documents::routes())
        .merge(routes::species::routes())
        .merge(routes::seasons::routes())
        .merge(routes::stats::routes())
        .merge(routes::records::routes())
        .merge(routes::suggestions::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
